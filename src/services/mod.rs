pub mod grading;
pub mod prompts;
pub mod report;
pub mod sanitizer;

pub use report::ReportRenderer;
