//! Session issuance and role gates.

pub mod middleware;
pub mod passwords;
pub mod sessions;

pub use middleware::{bearer_token, require_session, CurrentUser};
pub use sessions::{SessionStore, SessionUser};
