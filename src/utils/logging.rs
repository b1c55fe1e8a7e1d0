//! Logging setup and small text helpers

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber
///
/// Respects `RUST_LOG`; defaults to `info`. Safe to call more than once
/// (later calls are ignored), which keeps tests simple.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init();
}

/// Truncate long text for log output and error bodies
///
/// # Arguments
/// - `text`: original text
/// - `max_len`: maximum number of characters to keep
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_text() {
        assert_eq!(truncate_text("abcdef", 3), "abc...");
    }

    #[test]
    fn leaves_short_text_alone() {
        assert_eq!(truncate_text("abc", 10), "abc");
    }
}
