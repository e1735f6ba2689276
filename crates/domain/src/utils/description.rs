//! Calendar event description builder.
//!
//! The MALE_LEAD's mirrored event carries operational context in its
//! description: the partner (FEMALE_LEAD) cast for the same slot, and on
//! the day of the performance the reservation contact pulled from the
//! booking site. FEMALE_LEAD events carry no description.
//!
//! Descriptions are always rebuilt from database state rather than parsed
//! and edited in place, so clearing the reservation portion is just a
//! rebuild without the memo fields.

/// Inputs for a casting event description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CastingDescription {
    pub partner_name: Option<String>,
    pub reservation_name: Option<String>,
    pub reservation_contact: Option<String>,
}

/// Render the description text, or `None` when there is nothing to say.
pub fn build_casting_description(parts: &CastingDescription) -> Option<String> {
    let mut lines = Vec::new();

    if let Some(partner) = parts.partner_name.as_deref().filter(|s| !s.trim().is_empty()) {
        lines.push(format!("상대역: {}", partner));
    }
    if let Some(name) = parts.reservation_name.as_deref().filter(|s| !s.trim().is_empty()) {
        lines.push(format!("예약자: {}", name));
    }
    if let Some(contact) = parts.reservation_contact.as_deref().filter(|s| !s.trim().is_empty()) {
        lines.push(format!("연락처: {}", contact));
    }

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}
