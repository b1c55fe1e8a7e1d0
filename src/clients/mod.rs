//! Capability wrappers: one narrow client per external service

pub mod screenshot_client;
pub mod storage_client;
pub mod vision_client;
pub mod webhook_client;

pub use screenshot_client::ScreenshotClient;
pub use storage_client::StorageClient;
pub use vision_client::VisionClient;
pub use webhook_client::WebhookClient;
