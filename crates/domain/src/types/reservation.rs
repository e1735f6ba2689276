//! Reservation model types

use serde::{Deserialize, Serialize};

/// Per-slot reservation state fed by the booking-site crawler.
///
/// Deliberately independent of castings so reservation detection works for
/// slots nobody is cast into yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationStatus {
    pub id: String,
    pub performance_date_id: String,
    pub has_reservation: bool,
    pub reservation_name: Option<String>,
    pub reservation_contact: Option<String>,
    pub checked_at: i64,
}

/// One booking as pushed by the crawler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub customer_name: String,
    pub phone_number: String,
    /// Korean 12-hour label, e.g. "오후 3:15".
    pub booking_time: String,
    #[serde(default)]
    pub has_visitor: bool,
    #[serde(default)]
    pub visitor_name: Option<String>,
    #[serde(default)]
    pub visitor_phone: Option<String>,
}

/// The identity recorded on a reservation memo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingContact {
    pub name: String,
    pub phone: String,
}

impl Booking {
    /// Resolve which identity the memo should carry.
    ///
    /// Bookings made on behalf of someone else carry a separate visitor
    /// identity; when it is present it wins over the primary booker.
    pub fn resolved_contact(&self) -> BookingContact {
        if self.has_visitor {
            if let (Some(name), Some(phone)) = (&self.visitor_name, &self.visitor_phone) {
                if !name.trim().is_empty() && !phone.trim().is_empty() {
                    return BookingContact { name: name.clone(), phone: phone.clone() };
                }
            }
        }
        BookingContact { name: self.customer_name.clone(), phone: self.phone_number.clone() }
    }
}
