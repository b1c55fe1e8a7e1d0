//! Vision-analysis capability wrapper
//!
//! One multimodal request per audit: the grading prompt for the subject
//! category plus the screenshot as inline base64. The raw text reply goes
//! to the sanitizer untouched; this module never interprets it.

use std::time::Duration;

use base64::Engine as _;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppResult, AuditError, UpstreamError, UpstreamService};
use crate::model::{ScreenshotArtifact, SubjectCategory};
use crate::services::prompts;
use crate::utils::truncate_text;

const ERROR_BODY_MAX: usize = 300;

pub struct VisionClient {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
    max_retries: usize,
}

impl VisionClient {
    pub fn new(config: &Config) -> AppResult<Self> {
        // generative latency is much higher than the screenshot stage
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.analysis_timeout_secs))
            .build()
            .map_err(|e| AuditError::Internal(format!("vision client init: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.gemini_api_key.clone(),
            api_base: config.gemini_api_base.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
            max_retries: config.upstream_max_retries,
        })
    }

    /// Submit the screenshot for a structured critique
    ///
    /// # Returns
    /// The model's raw text reply, which may still be fence-wrapped.
    pub async fn analyze(
        &self,
        artifact: &ScreenshotArtifact,
        category: SubjectCategory,
    ) -> AppResult<String> {
        let prompt = prompts::grading_prompt(category);

        let mut attempt = 0;
        loop {
            match self.try_analyze(&prompt, artifact).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    let delay = Duration::from_secs(1 << attempt);
                    warn!(
                        "analysis attempt {}/{} failed ({}), retrying in {:?}",
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

    async fn try_analyze(
        &self,
        prompt: &str,
        artifact: &ScreenshotArtifact,
    ) -> Result<String, UpstreamError> {
        debug!("calling vision model {} ({} image bytes)", self.model, artifact.bytes.len());

        let image_base64 = base64::engine::general_purpose::STANDARD.encode(&artifact.bytes);

        let body = json!({
            "contents": [{
                "parts": [
                    { "text": prompt },
                    {
                        "inline_data": {
                            "mime_type": artifact.media_type,
                            "data": image_base64
                        }
                    }
                ]
            }]
        });

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.api_base, self.model, self.api_key
        );

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| UpstreamError::Transport {
                service: UpstreamService::VisionAnalysis,
                source: Box::new(e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::BadStatus {
                service: UpstreamService::VisionAnalysis,
                status: status.as_u16(),
                body: truncate_text(&body, ERROR_BODY_MAX),
            });
        }

        let payload: Value = response.json().await.map_err(|e| UpstreamError::Transport {
            service: UpstreamService::VisionAnalysis,
            source: Box::new(e),
        })?;

        extract_reply_text(&payload)
    }
}

/// Pull the reply text out of a `generateContent` response
fn extract_reply_text(payload: &Value) -> Result<String, UpstreamError> {
    let text = payload
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.get(0))
        .and_then(|p| p.get("text"))
        .and_then(|t| t.as_str())
        .ok_or_else(|| UpstreamError::MalformedResponse {
            service: UpstreamService::VisionAnalysis,
            detail: "no candidates[0].content.parts[0].text in response".to_string(),
        })?;

    if text.trim().is_empty() {
        return Err(UpstreamError::MalformedResponse {
            service: UpstreamService::VisionAnalysis,
            detail: "model returned empty content".to_string(),
        });
    }

    Ok(text.to_string())
}
