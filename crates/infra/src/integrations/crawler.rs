//! Reservation-crawler webhook client.
//!
//! The crawler is an external service that scrapes the booking site and
//! pushes snapshots back to the reservation endpoints. This client only
//! kicks it; the 60-second timeout is the one explicit client timeout in
//! the system.

use std::time::Duration;

use async_trait::async_trait;
use callboard_core::reservation::ports::CrawlerTrigger;
use callboard_domain::constants::CRAWLER_WEBHOOK_TIMEOUT_SECS;
use callboard_domain::{CallboardError, Result};
use reqwest::Client;
use serde_json::json;
use tracing::{debug, instrument};

use crate::errors::InfraError;

/// Webhook-backed implementation of CrawlerTrigger
pub struct WebhookCrawlerTrigger {
    http: Client,
    webhook_url: String,
}

impl WebhookCrawlerTrigger {
    pub fn new(webhook_url: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(CRAWLER_WEBHOOK_TIMEOUT_SECS))
            .build()
            .map_err(|e| CallboardError::Config(format!("failed to build http client: {}", e)))?;
        Ok(Self { http, webhook_url })
    }
}

#[async_trait]
impl CrawlerTrigger for WebhookCrawlerTrigger {
    #[instrument(skip(self))]
    async fn trigger(&self) -> Result<serde_json::Value> {
        let response = self
            .http
            .post(&self.webhook_url)
            .json(&json!({ "trigger": "manual" }))
            .send()
            .await
            .map_err(InfraError::from)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CallboardError::ExternalService(format!(
                "crawler webhook failed ({}): {}",
                status, detail
            )));
        }

        let body = response.json::<serde_json::Value>().await.unwrap_or(json!({}));
        debug!("crawler sync triggered");
        Ok(body)
    }
}
