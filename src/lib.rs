//! # Website Audit
//!
//! Automated website-quality audits: screenshot a target URL, have a
//! vision model grade it against a fixed scorecard, render a branded HTML
//! report, publish it to object storage, and deliver the outcome to a
//! configured webhook.
//!
//! ## Architecture
//!
//! The system is layered strictly; each layer only calls downward:
//!
//! ### ① Capability layer (clients)
//! - `clients/` - one narrow wrapper per external service
//! - `ScreenshotClient` - screenshot-rendering service
//! - `VisionClient` - multimodal grading model
//! - `StorageClient` - report publication
//! - `WebhookClient` - fire-and-forget result delivery
//!
//! ### ② Service layer
//! - `services/` - pure logic, no I/O
//! - `sanitizer` - fence stripping + canonical-schema validation
//! - `grading` - score banding (grade letter, display color)
//! - `prompts` - grading-prompt table by subject category
//! - `ReportRenderer` - deterministic HTML rendering
//!
//! ### ③ Flow layer
//! - `workflow/` - the complete processing flow of one audit
//! - `AuditCtx` - per-task context (audit id + request)
//! - `AuditFlow` - capture → analyze → sanitize → render → publish →
//!   notify, with failure isolation and exactly-one notification
//!
//! ### ④ Orchestration layer
//! - `orchestrator/intake` - validation, capacity gate, task spawn
//! - `api/server` - thin axum routing over the intake
//!
//! ## Failure contract
//!
//! Validation and configuration errors reject synchronously; every other
//! error belongs to the spawned task and is converted into a failure
//! notification at the task boundary. The original HTTP caller never sees
//! a stage failure.

pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// re-export common types
pub use config::Config;
pub use error::{AppResult, AuditError};
pub use model::{AuditRequest, AuditResult, IntakeAck, NotificationPayload, SubjectCategory};
pub use orchestrator::Intake;
pub use workflow::{AuditCtx, AuditFlow};
