pub mod audit;
pub mod subject;

pub use audit::{
    normalize_url, AuditRequest, AuditResult, Categories, CaptureSettings, CategoryScore,
    IntakeAck, NotificationPayload, Priority, Recommendation, ScreenshotArtifact, CATEGORY_MAX,
};
pub use subject::SubjectCategory;
