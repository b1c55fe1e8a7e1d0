//! Result notification
//!
//! Fire-and-forget delivery of the terminal payload to the configured
//! callback URL. With no URL configured this is a documented no-op, which
//! is a normal deployment state. Delivery failures are logged and never
//! escalate: this runs in the terminal position of the task and nothing
//! downstream could act on the error.

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppResult, AuditError};
use crate::model::NotificationPayload;

pub struct WebhookClient {
    client: reqwest::Client,
    url: Option<String>,
}

impl WebhookClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AuditError::Internal(format!("webhook client init: {}", e)))?;

        Ok(Self {
            client,
            url: config.webhook_url.clone(),
        })
    }

    /// Deliver the payload with a single POST; no retry, no escalation
    pub async fn notify(&self, payload: &NotificationPayload) {
        let Some(url) = &self.url else {
            debug!("no callback URL configured, skipping notification");
            return;
        };

        match self.client.post(url).json(payload).send().await {
            Ok(response) if response.status().is_success() => {
                info!("🔔 notification delivered for {}", payload.target_url);
            }
            Ok(response) => {
                warn!(
                    "notification for {} rejected with status {}",
                    payload.target_url,
                    response.status()
                );
            }
            Err(e) => {
                warn!(
                    "notification delivery for {} failed: {}",
                    payload.target_url, e
                );
            }
        }
    }
}
