//! Screenshot capability wrapper
//!
//! Wraps the external screenshot-rendering service behind one `capture`
//! call. The capture configuration is fixed: above-the-fold only at
//! 1920x1080, PNG, with ads and cookie banners blocked.

use std::time::Duration;

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppResult, AuditError, UpstreamError, UpstreamService};
use crate::model::{CaptureSettings, ScreenshotArtifact};
use crate::utils::truncate_text;

/// Characters of upstream body kept in error messages
const ERROR_BODY_MAX: usize = 300;

/// Fixed capture configuration for every audit
const CAPTURE: CaptureSettings = CaptureSettings {
    viewport_width: 1920,
    viewport_height: 1080,
    device_scale_factor: 1,
    quality: 80,
    full_page: false,
};

pub struct ScreenshotClient {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    max_retries: usize,
}

impl ScreenshotClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.screenshot_timeout_secs))
            .build()
            .map_err(|e| AuditError::Internal(format!("screenshot client init: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.screenshot_api_key.clone(),
            api_base: config.screenshot_api_base.trim_end_matches('/').to_string(),
            max_retries: config.upstream_max_retries,
        })
    }

    /// Capture an above-the-fold screenshot of the target URL
    ///
    /// Retries transport errors, 429 and 5xx with exponential backoff;
    /// any other non-success status fails immediately so e.g. a 403 from
    /// the capture service short-circuits the pipeline.
    pub async fn capture(&self, target_url: &str) -> AppResult<ScreenshotArtifact> {
        let mut attempt = 0;
        loop {
            match self.try_capture(target_url).await {
                Ok(artifact) => return Ok(artifact),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    let delay = Duration::from_secs(1 << attempt);
                    warn!(
                        "screenshot attempt {}/{} failed ({}), retrying in {:?}",
                        attempt + 1,
                        self.max_retries + 1,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    async fn try_capture(&self, target_url: &str) -> Result<ScreenshotArtifact, UpstreamError> {
        debug!("requesting screenshot for {}", target_url);

        let viewport_width = CAPTURE.viewport_width.to_string();
        let viewport_height = CAPTURE.viewport_height.to_string();
        let device_scale_factor = CAPTURE.device_scale_factor.to_string();
        let quality = CAPTURE.quality.to_string();
        let full_page = CAPTURE.full_page.to_string();

        let response = self
            .client
            .get(format!("{}/take", self.api_base))
            .query(&[
                ("access_key", self.api_key.as_str()),
                ("url", target_url),
                ("viewport_width", viewport_width.as_str()),
                ("viewport_height", viewport_height.as_str()),
                ("device_scale_factor", device_scale_factor.as_str()),
                ("format", "png"),
                ("image_quality", quality.as_str()),
                ("full_page", full_page.as_str()),
                ("block_ads", "true"),
                ("block_cookie_banners", "true"),
            ])
            .send()
            .await
            .map_err(|e| UpstreamError::Transport {
                service: UpstreamService::Screenshot,
                source: Box::new(e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::BadStatus {
                service: UpstreamService::Screenshot,
                status: status.as_u16(),
                body: truncate_text(&body, ERROR_BODY_MAX),
            });
        }

        let bytes = response.bytes().await.map_err(|e| UpstreamError::Transport {
            service: UpstreamService::Screenshot,
            source: Box::new(e),
        })?;

        debug!("screenshot captured ({} bytes)", bytes.len());

        Ok(ScreenshotArtifact {
            bytes: bytes.to_vec(),
            media_type: "image/png",
            settings: CAPTURE,
        })
    }
}
