//! OAuth token management for the calendar API.
//!
//! Exchanges a long-lived refresh token for short-lived access tokens and
//! caches the current one inside the provider instance. The cache lives on
//! the injected provider, not in module state, so its lifetime is owned by
//! the application context.

use callboard_domain::{CalendarConfig, CallboardError, Result};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::InfraError;

const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Refresh skew: renew this many seconds before actual expiry.
const EXPIRY_SKEW_SECS: i64 = 60;

#[derive(Debug, Deserialize)]
struct TokenRefreshResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Default)]
struct CachedToken {
    access_token: String,
    expires_at: i64,
}

/// Access-token provider with an instance-level cache.
pub struct CalendarTokenProvider {
    http: Client,
    token_url: String,
    client_id: String,
    client_secret: String,
    refresh_token: String,
    cached: RwLock<Option<CachedToken>>,
}

impl CalendarTokenProvider {
    pub fn new(http: Client, config: &CalendarConfig) -> Self {
        Self {
            http,
            token_url: GOOGLE_TOKEN_URL.to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            refresh_token: config.refresh_token.clone(),
            cached: RwLock::new(None),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    /// Current access token, refreshing if missing or about to expire.
    pub async fn access_token(&self) -> Result<String> {
        let now = Utc::now().timestamp();

        if let Some(cached) = self.cached.read().await.as_ref() {
            if cached.expires_at - EXPIRY_SKEW_SECS > now {
                return Ok(cached.access_token.clone());
            }
        }

        let mut guard = self.cached.write().await;
        // Another task may have refreshed while we waited for the lock.
        if let Some(cached) = guard.as_ref() {
            if cached.expires_at - EXPIRY_SKEW_SECS > now {
                return Ok(cached.access_token.clone());
            }
        }

        let refreshed = self.refresh().await?;
        let token = refreshed.access_token.clone();
        *guard = Some(CachedToken {
            access_token: refreshed.access_token,
            expires_at: now + refreshed.expires_in,
        });

        debug!(expires_in = refreshed.expires_in, "calendar access token refreshed");
        Ok(token)
    }

    async fn refresh(&self) -> Result<TokenRefreshResponse> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", self.refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| {
                InfraError(CallboardError::Auth(format!("token refresh request failed: {}", e)))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            return Err(InfraError(CallboardError::Auth(format!(
                "token refresh failed ({}): {}",
                status, error_text
            )))
            .into());
        }

        response.json::<TokenRefreshResponse>().await.map_err(|e| {
            InfraError(CallboardError::Auth(format!("failed to parse token response: {}", e)))
                .into()
        })
    }
}
