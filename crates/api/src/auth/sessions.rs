//! In-process session store.
//!
//! Sessions are opaque bearer tokens mapped to the authenticated user.
//! State lives in the application context (not module state) and dies with
//! the process; unexpired sessions are pruned lazily on access.

use std::collections::HashMap;
use std::time::Duration;

use callboard_domain::Role;
use chrono::Utc;
use parking_lot::RwLock;
use rand::RngCore;

/// The authenticated principal carried by a session.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub user_id: String,
    pub name: Option<String>,
    pub role: Role,
    pub actor_id: Option<String>,
}

impl SessionUser {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Per-handler role check for admin-only operations.
    pub fn ensure_admin(&self) -> callboard_domain::Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(callboard_domain::CallboardError::Forbidden("admin role required".into()))
        }
    }
}

struct SessionEntry {
    user: SessionUser,
    expires_at: i64,
}

/// Token → session map with TTL.
pub struct SessionStore {
    ttl: Duration,
    sessions: RwLock<HashMap<String, SessionEntry>>,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, sessions: RwLock::new(HashMap::new()) }
    }

    /// Issue a fresh token for the given user.
    pub fn issue(&self, user: SessionUser) -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);

        let expires_at = Utc::now().timestamp() + self.ttl.as_secs() as i64;
        self.sessions.write().insert(token.clone(), SessionEntry { user, expires_at });
        token
    }

    /// Resolve a token, dropping it when expired.
    pub fn get(&self, token: &str) -> Option<SessionUser> {
        let now = Utc::now().timestamp();

        {
            let sessions = self.sessions.read();
            match sessions.get(token) {
                Some(entry) if entry.expires_at > now => return Some(entry.user.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        self.sessions.write().remove(token);
        None
    }

    pub fn revoke(&self, token: &str) {
        self.sessions.write().remove(token);
    }
}
