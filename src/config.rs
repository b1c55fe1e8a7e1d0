use crate::error::{AppResult, ConfigError};
use serde::Serialize;

/// Service configuration
///
/// Built once in `main` and passed by reference into every component
/// constructor. Credentials default to empty and must come from the
/// environment; `validate()` catches the gaps before any task spawns.
#[derive(Clone, Debug)]
pub struct Config {
    /// HTTP listen port
    pub port: u16,
    // --- screenshot service ---
    pub screenshot_api_key: String,
    pub screenshot_api_base: String,
    pub screenshot_timeout_secs: u64,
    // --- vision analysis service ---
    pub gemini_api_key: String,
    pub gemini_api_base: String,
    pub gemini_model: String,
    pub analysis_timeout_secs: u64,
    // --- object storage ---
    pub storage_api_base: String,
    pub storage_bucket: String,
    pub storage_api_key: String,
    pub storage_public_base_url: String,
    // --- result notification ---
    pub webhook_url: Option<String>,
    // --- pipeline tuning ---
    pub max_concurrent_audits: usize,
    pub upstream_max_retries: usize,
    /// Fixed link for the report's call-to-action block
    pub report_cta_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            screenshot_api_key: String::new(),
            screenshot_api_base: "https://api.screenshotone.com".to_string(),
            screenshot_timeout_secs: 45,
            gemini_api_key: String::new(),
            gemini_api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            gemini_model: "gemini-2.0-flash".to_string(),
            analysis_timeout_secs: 90,
            storage_api_base: String::new(),
            storage_bucket: "audit-reports".to_string(),
            storage_api_key: String::new(),
            storage_public_base_url: String::new(),
            webhook_url: None,
            max_concurrent_audits: 16,
            upstream_max_retries: 2,
            report_cta_url: "https://nexli.net/book".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            port: std::env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.port),
            screenshot_api_key: std::env::var("SCREENSHOT_API_KEY").unwrap_or(default.screenshot_api_key),
            screenshot_api_base: std::env::var("SCREENSHOT_API_BASE").unwrap_or(default.screenshot_api_base),
            screenshot_timeout_secs: std::env::var("SCREENSHOT_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.screenshot_timeout_secs),
            gemini_api_key: std::env::var("GEMINI_API_KEY").unwrap_or(default.gemini_api_key),
            gemini_api_base: std::env::var("GEMINI_API_BASE").unwrap_or(default.gemini_api_base),
            gemini_model: std::env::var("GEMINI_MODEL").unwrap_or(default.gemini_model),
            analysis_timeout_secs: std::env::var("ANALYSIS_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.analysis_timeout_secs),
            storage_api_base: std::env::var("STORAGE_API_BASE").unwrap_or(default.storage_api_base),
            storage_bucket: std::env::var("STORAGE_BUCKET").unwrap_or(default.storage_bucket),
            storage_api_key: std::env::var("STORAGE_API_KEY").unwrap_or(default.storage_api_key),
            storage_public_base_url: std::env::var("STORAGE_PUBLIC_BASE_URL").unwrap_or(default.storage_public_base_url),
            webhook_url: std::env::var("WEBHOOK_URL").ok().filter(|v| !v.trim().is_empty()),
            max_concurrent_audits: std::env::var("MAX_CONCURRENT_AUDITS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_audits),
            upstream_max_retries: std::env::var("UPSTREAM_MAX_RETRIES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.upstream_max_retries),
            report_cta_url: std::env::var("REPORT_CTA_URL").unwrap_or(default.report_cta_url),
        }
    }

    /// Check that every credential the pipeline will need is present
    ///
    /// Runs at intake so a misconfigured deployment fails synchronously
    /// instead of inside a spawned task.
    pub fn validate(&self) -> AppResult<()> {
        if self.screenshot_api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential {
                name: "SCREENSHOT_API_KEY",
            }
            .into());
        }
        if self.gemini_api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential {
                name: "GEMINI_API_KEY",
            }
            .into());
        }
        if self.storage_api_base.trim().is_empty() {
            return Err(ConfigError::MissingCredential {
                name: "STORAGE_API_BASE",
            }
            .into());
        }
        if self.storage_api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential {
                name: "STORAGE_API_KEY",
            }
            .into());
        }
        if self.storage_public_base_url.trim().is_empty() {
            return Err(ConfigError::MissingCredential {
                name: "STORAGE_PUBLIC_BASE_URL",
            }
            .into());
        }
        Ok(())
    }

    /// Boolean presence of each required value, for the status endpoint
    pub fn status(&self) -> ConfigStatus {
        ConfigStatus {
            screenshot_api_key: !self.screenshot_api_key.trim().is_empty(),
            gemini_api_key: !self.gemini_api_key.trim().is_empty(),
            storage_credentials: !self.storage_api_base.trim().is_empty()
                && !self.storage_api_key.trim().is_empty()
                && !self.storage_public_base_url.trim().is_empty(),
            webhook_url: self.webhook_url.is_some(),
        }
    }
}

/// Presence report for operational visibility; never exposes values
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigStatus {
    pub screenshot_api_key: bool,
    pub gemini_api_key: bool,
    pub storage_credentials: bool,
    pub webhook_url: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AuditError;

    fn configured() -> Config {
        Config {
            screenshot_api_key: "sk".to_string(),
            gemini_api_key: "gk".to_string(),
            storage_api_base: "https://storage.example.com".to_string(),
            storage_api_key: "tk".to_string(),
            storage_public_base_url: "https://cdn.example.com".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn validate_passes_when_fully_configured() {
        assert!(configured().validate().is_ok());
    }

    #[test]
    fn validate_names_first_missing_credential() {
        let config = Config::default();
        match config.validate() {
            Err(AuditError::Config(e)) => {
                assert!(e.to_string().contains("SCREENSHOT_API_KEY"));
            }
            other => panic!("expected config error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn status_reports_presence_only() {
        let status = Config::default().status();
        assert!(!status.screenshot_api_key);
        assert!(!status.gemini_api_key);
        assert!(!status.storage_credentials);
        assert!(!status.webhook_url);

        let mut config = configured();
        config.webhook_url = Some("https://hooks.example.com/done".to_string());
        let status = config.status();
        assert!(status.screenshot_api_key);
        assert!(status.gemini_api_key);
        assert!(status.storage_credentials);
        assert!(status.webhook_url);
    }

    #[test]
    fn blank_webhook_env_counts_as_unset() {
        let config = Config {
            webhook_url: None,
            ..Config::default()
        };
        assert!(!config.status().webhook_url);
    }
}
