//! Audit data model
//!
//! Wire shapes for one audit task: the normalized inbound request, the
//! ephemeral screenshot, the canonical scored result, and the terminal
//! notification payload. The result schema is fixed at four 25-point
//! categories; payloads that do not match it are rejected at sanitation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppResult, ValidationError};
use crate::model::subject::SubjectCategory;

/// Maximum score of a single category (canonical 4 x 25 schema)
pub const CATEGORY_MAX: u32 = 25;

// ========== inbound request ==========

/// A validated, normalized audit request
///
/// Created at intake and owned exclusively by the spawned task.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRequest {
    pub target_url: String,
    pub contact_id: Option<String>,
    pub contact_email: Option<String>,
    pub contact_name: Option<String>,
    pub subject_category: SubjectCategory,
}

/// Synonym chains for inbound fields, first match wins
const TARGET_KEYS: [&str; 4] = ["website_url", "websiteUrl", "website", "url"];
const CONTACT_ID_KEYS: [&str; 3] = ["id", "contact_id", "contactId"];
const EMAIL_KEYS: [&str; 3] = ["email", "contact_email", "contactEmail"];
const NAME_KEYS: [&str; 3] = ["name", "contact_name", "contactName"];
const CATEGORY_KEYS: [&str; 4] = ["business_type", "businessType", "industry", "niche"];

impl AuditRequest {
    /// Build a request from a raw JSON map with synonym field names
    ///
    /// Rejects with `MissingTarget` when no URL synonym resolves to a
    /// non-empty string; no task is spawned in that case.
    pub fn from_raw(raw: &Value) -> AppResult<Self> {
        let target = first_string(raw, &TARGET_KEYS).ok_or(ValidationError::MissingTarget)?;

        let category_text = first_string(raw, &CATEGORY_KEYS);

        Ok(Self {
            target_url: normalize_url(&target),
            contact_id: first_string(raw, &CONTACT_ID_KEYS),
            contact_email: first_string(raw, &EMAIL_KEYS),
            contact_name: first_string(raw, &NAME_KEYS),
            subject_category: SubjectCategory::find(category_text.as_deref()),
        })
    }

    /// Display name for the report header: contact name, else bare host
    pub fn display_name(&self) -> String {
        if let Some(name) = &self.contact_name {
            if !name.trim().is_empty() {
                return name.trim().to_string();
            }
        }
        self.target_url
            .trim_start_matches("https://")
            .trim_start_matches("http://")
            .trim_end_matches('/')
            .to_string()
    }
}

/// Resolve the first non-empty string among synonym keys
fn first_string(raw: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(value) = raw.get(key).and_then(|v| v.as_str()) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

/// Trim and prefix `https://` unless a scheme is already present
///
/// Idempotent: an already-schemed URL passes through unchanged.
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

// ========== screenshot ==========

/// Parameters a screenshot was produced with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureSettings {
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub device_scale_factor: u8,
    pub quality: u8,
    /// Above-the-fold only when false
    pub full_page: bool,
}

/// One captured screenshot; never persisted, lives for one task only
#[derive(Debug, Clone)]
pub struct ScreenshotArtifact {
    pub bytes: Vec<u8>,
    /// MIME type matching the capture format, e.g. `image/png`
    pub media_type: &'static str,
    pub settings: CaptureSettings,
}

// ========== scored result ==========

/// Structured audit result in the canonical schema
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    pub overall_score: u32,
    pub grade: String,
    #[serde(default)]
    pub summary: String,
    pub categories: Categories,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub competitive_insight: String,
    #[serde(default)]
    pub bottom_line: String,
}

/// The fixed category set; a missing key fails deserialization
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Categories {
    pub first_impression: CategoryScore,
    pub visual_design: CategoryScore,
    pub user_experience: CategoryScore,
    pub conversion: CategoryScore,
}

impl Categories {
    /// Categories in render order with their display names
    pub fn iter(&self) -> [(&'static str, &CategoryScore); 4] {
        [
            ("First Impression", &self.first_impression),
            ("Visual Design & Branding", &self.visual_design),
            ("User Experience & Navigation", &self.user_experience),
            ("Lead Capture & Conversion", &self.conversion),
        ]
    }

    pub fn total(&self) -> u32 {
        self.iter().iter().map(|(_, c)| c.score).sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub score: u32,
    #[serde(default)]
    pub findings: String,
    #[serde(default)]
    pub opportunity: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub priority: Priority,
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub impact: String,
    #[serde(default)]
    pub recommendation: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
}

impl Priority {
    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
        }
    }
}

// ========== intake acknowledgement ==========

/// Immediate response to an accepted request; not the audit outcome
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntakeAck {
    pub success: bool,
    pub message: String,
    pub target_url: String,
    pub contact_id: Option<String>,
}

// ========== terminal notification ==========

/// The task's terminal output, built exactly once per audit
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPayload {
    pub contact_id: Option<String>,
    pub contact_email: Option<String>,
    pub contact_name: Option<String>,
    pub target_url: String,
    pub success: bool,
    pub report_url: Option<String>,
    pub audit_result: Option<AuditResult>,
    pub error: Option<String>,
    pub processed_at: DateTime<Utc>,
}
