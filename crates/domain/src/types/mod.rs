//! Domain types and models

pub mod actor;
pub mod casting;
pub mod reservation;
pub mod schedule;
pub mod user;

pub use actor::{
    Actor, ActorDetail, ActorMonthOverride, ActorSummary, ActorUpdate, NewActor, RoleType,
};
pub use casting::{Casting, CastingChange, CastingChangeResult};
pub use reservation::{Booking, BookingContact, ReservationStatus};
pub use schedule::{NewPerformanceSlot, PerformanceDate, UnavailableDate};
pub use user::{Role, User};
