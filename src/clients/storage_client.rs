//! Artifact publication
//!
//! Uploads the rendered report to the object-storage gateway and derives
//! the public URL from the storage key. Uploads are not retried: the key
//! is fresh per attempt and a storage failure is pipeline-terminal anyway.

use std::time::Duration;

use rand::{distributions::Alphanumeric, Rng};
use tracing::debug;

use crate::config::Config;
use crate::error::{AppResult, AuditError, UpstreamService};
use crate::utils::truncate_text;

const ERROR_BODY_MAX: usize = 300;

pub struct StorageClient {
    client: reqwest::Client,
    api_base: String,
    bucket: String,
    api_key: String,
    public_base_url: String,
}

impl StorageClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AuditError::Internal(format!("storage client init: {}", e)))?;

        Ok(Self {
            client,
            api_base: config.storage_api_base.trim_end_matches('/').to_string(),
            bucket: config.storage_bucket.clone(),
            api_key: config.storage_api_key.clone(),
            public_base_url: config.storage_public_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Upload one report document and return its public URL
    pub async fn publish(&self, key: &str, html: String) -> AppResult<String> {
        debug!("uploading report to {}/{}", self.bucket, key);

        let response = self
            .client
            .put(format!("{}/{}/{}", self.api_base, self.bucket, key))
            .bearer_auth(&self.api_key)
            .header("Content-Type", "text/html; charset=utf-8")
            .body(html)
            .send()
            .await
            .map_err(|e| AuditError::upstream_transport(UpstreamService::ObjectStorage, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuditError::upstream_status(
                UpstreamService::ObjectStorage,
                status.as_u16(),
                truncate_text(&body, ERROR_BODY_MAX),
            ));
        }

        Ok(format!("{}/{}", self.public_base_url, key))
    }
}

/// Generate a collision-resistant storage key for one report
///
/// Date component for operability, random token for uniqueness.
pub fn generate_report_key() -> String {
    let date = chrono::Utc::now().format("%Y%m%d");
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(10)
        .map(char::from)
        .collect();
    format!("audits/{}/{}.html", date, token.to_lowercase())
}
