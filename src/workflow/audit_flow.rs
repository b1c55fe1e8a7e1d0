//! Audit pipeline - flow layer
//!
//! Defines the complete processing flow of one audit:
//! capture → analyze → sanitize → render → publish → notify.
//!
//! The central correctness property lives here: every task that enters
//! `run` produces exactly one notification attempt, whether the stages all
//! succeed, any stage fails, or something panics. Stage errors never
//! escape the task; the notifier runs in the terminal position and its
//! own failures are swallowed inside the webhook client.

use chrono::Utc;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tracing::{error, info};

use crate::clients::{storage_client, ScreenshotClient, StorageClient, VisionClient, WebhookClient};
use crate::config::Config;
use crate::error::{AppResult, AuditError};
use crate::model::{AuditRequest, AuditResult, NotificationPayload};
use crate::services::{sanitizer, ReportRenderer};
use crate::workflow::audit_ctx::AuditCtx;

/// Pipeline stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Capture,
    Analyze,
    Sanitize,
    Render,
    Publish,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Capture => "capture",
            Stage::Analyze => "analyze",
            Stage::Sanitize => "sanitize",
            Stage::Render => "render",
            Stage::Publish => "publish",
        }
    }
}

/// What a fully successful pipeline hands to the notifier
#[derive(Debug)]
pub struct AuditOutcome {
    pub result: AuditResult,
    pub report_url: String,
}

/// One audit pipeline
///
/// - sequences the capability calls for a single task
/// - owns failure isolation (short-circuit plus exactly-one notification)
/// - holds no shared mutable state; safe to share behind an `Arc`
pub struct AuditFlow {
    screenshot: ScreenshotClient,
    vision: VisionClient,
    renderer: ReportRenderer,
    storage: StorageClient,
    webhook: WebhookClient,
}

impl AuditFlow {
    pub fn new(config: &Config) -> AppResult<Self> {
        Ok(Self {
            screenshot: ScreenshotClient::new(config)?,
            vision: VisionClient::new(config)?,
            renderer: ReportRenderer::new(config),
            storage: StorageClient::new(config)?,
            webhook: WebhookClient::new(config)?,
        })
    }

    /// Run one audit to completion; never returns an error
    ///
    /// Panics inside the stages are caught at this boundary and converted
    /// into a failure notification like any other stage error.
    pub async fn run(&self, ctx: AuditCtx) {
        info!(
            "[audit {}] 🚀 starting audit of {} ({})",
            ctx.audit_id,
            ctx.request.target_url,
            ctx.request.subject_category
        );

        let outcome = match AssertUnwindSafe(self.run_stages(&ctx)).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => Err(AuditError::Internal(describe_panic(panic))),
        };

        match &outcome {
            Ok(outcome) => info!(
                "[audit {}] ✅ audit complete: {}/100, report at {}",
                ctx.audit_id, outcome.result.overall_score, outcome.report_url
            ),
            Err(e) => error!("[audit {}] ❌ audit failed: {}", ctx.audit_id, e),
        }

        let payload = build_notification(&ctx.request, outcome);
        self.webhook.notify(&payload).await;

        info!("[audit {}] task finished", ctx.audit_id);
    }

    /// The failable part of the pipeline; each `?` short-circuits the rest
    async fn run_stages(&self, ctx: &AuditCtx) -> AppResult<AuditOutcome> {
        let id = &ctx.audit_id;
        let request = &ctx.request;

        // ========== stage 1: capture ==========
        self.log_stage(id, Stage::Capture);
        let screenshot = self.screenshot.capture(&request.target_url).await?;
        info!("[audit {}] ✓ screenshot captured ({} bytes)", id, screenshot.bytes.len());

        // ========== stage 2: analyze ==========
        self.log_stage(id, Stage::Analyze);
        let raw_reply = self
            .vision
            .analyze(&screenshot, request.subject_category)
            .await?;

        // ========== stage 3: sanitize ==========
        self.log_stage(id, Stage::Sanitize);
        let result = sanitizer::sanitize_and_validate(&raw_reply)?;
        info!(
            "[audit {}] ✓ scored {}/100 (grade {})",
            id, result.overall_score, result.grade
        );

        // ========== stage 4: render ==========
        self.log_stage(id, Stage::Render);
        let html = self.renderer.render(&result, request, Utc::now());

        // ========== stage 5: publish ==========
        self.log_stage(id, Stage::Publish);
        let key = storage_client::generate_report_key();
        let report_url = self.storage.publish(&key, html).await?;
        info!("[audit {}] ✓ report published: {}", id, report_url);

        Ok(AuditOutcome { result, report_url })
    }

    fn log_stage(&self, audit_id: &str, stage: Stage) {
        info!("[audit {}] ▶ {}", audit_id, stage.name());
    }
}

/// Build the task's terminal payload from its outcome
///
/// Created exactly once per task, immediately before notification.
pub fn build_notification(
    request: &AuditRequest,
    outcome: AppResult<AuditOutcome>,
) -> NotificationPayload {
    let (success, report_url, audit_result, error) = match outcome {
        Ok(outcome) => (true, Some(outcome.report_url), Some(outcome.result), None),
        Err(e) => (false, None, None, Some(e.to_string())),
    };

    NotificationPayload {
        contact_id: request.contact_id.clone(),
        contact_email: request.contact_email.clone(),
        contact_name: request.contact_name.clone(),
        target_url: request.target_url.clone(),
        success,
        report_url,
        audit_result,
        error,
        processed_at: Utc::now(),
    }
}

fn describe_panic(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        format!("audit task panicked: {}", msg)
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        format!("audit task panicked: {}", msg)
    } else {
        "audit task panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{UpstreamError, UpstreamService};
    use crate::model::{Categories, CategoryScore, SubjectCategory};

    fn request() -> AuditRequest {
        AuditRequest {
            target_url: "https://acme.example.com".to_string(),
            contact_id: Some("c-9".to_string()),
            contact_email: Some("owner@acme.example.com".to_string()),
            contact_name: Some("Acme".to_string()),
            subject_category: SubjectCategory::Default,
        }
    }

    fn category(score: u32) -> CategoryScore {
        CategoryScore {
            score,
            findings: String::new(),
            opportunity: String::new(),
        }
    }

    fn outcome() -> AuditOutcome {
        AuditOutcome {
            result: AuditResult {
                overall_score: 80,
                grade: "B".to_string(),
                summary: String::new(),
                categories: Categories {
                    first_impression: category(20),
                    visual_design: category(20),
                    user_experience: category(20),
                    conversion: category(20),
                },
                recommendations: vec![],
                competitive_insight: String::new(),
                bottom_line: String::new(),
            },
            report_url: "https://cdn.example.com/audits/20260314/abc.html".to_string(),
        }
    }

    #[test]
    fn success_payload_carries_report_and_result() {
        let payload = build_notification(&request(), Ok(outcome()));
        assert!(payload.success);
        assert_eq!(
            payload.report_url.as_deref(),
            Some("https://cdn.example.com/audits/20260314/abc.html")
        );
        assert!(payload.audit_result.is_some());
        assert!(payload.error.is_none());
        assert_eq!(payload.contact_id.as_deref(), Some("c-9"));
        assert_eq!(payload.target_url, "https://acme.example.com");
    }

    #[test]
    fn failure_payload_carries_nonempty_error() {
        let err = AuditError::Upstream(UpstreamError::BadStatus {
            service: UpstreamService::Screenshot,
            status: 403,
            body: "forbidden".to_string(),
        });
        let payload = build_notification(&request(), Err(err));
        assert!(!payload.success);
        assert!(payload.report_url.is_none());
        assert!(payload.audit_result.is_none());
        let error = payload.error.expect("failure must carry an error");
        assert!(!error.is_empty());
        assert!(error.contains("403"));
    }

    #[test]
    fn describes_panics_with_their_message() {
        let panic: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(describe_panic(panic), "audit task panicked: boom");

        let opaque: Box<dyn std::any::Any + Send> = Box::new(42_u32);
        assert_eq!(describe_panic(opaque), "audit task panicked");
    }

    #[test]
    fn stage_names_follow_pipeline_order() {
        let names: Vec<&str> = [
            Stage::Capture,
            Stage::Analyze,
            Stage::Sanitize,
            Stage::Render,
            Stage::Publish,
        ]
        .iter()
        .map(|s| s.name())
        .collect();
        assert_eq!(names, ["capture", "analyze", "sanitize", "render", "publish"]);
    }
}
