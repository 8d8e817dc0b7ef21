//! Logging utilities
//!
//! Subscriber setup and helpers that keep response bodies out of log lines

use crate::config::settings::LoggingConfig;
use serde_json::Value;

/// Maximum number of characters of a body written to a log line
pub const MAX_LOGGED_BODY_LEN: usize = 200;

/// Initialize logging system
///
/// Uses the JSON formatter when `format` is `json`, human readable output otherwise.
/// Returns an error when a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let subscriber: Box<dyn tracing::Subscriber + Send + Sync> = if config.format == "json" {
        // JSON format logs (production environment)
        Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(config.level.as_str())
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .finish(),
        )
    } else {
        // Human readable format (development environment)
        Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(config.level.as_str())
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .finish(),
        )
    };

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::info!("Logging system initialized");
    Ok(())
}

/// Truncate a string with a note about original length
pub fn truncate_content(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let head: String = s.chars().take(max_len).collect();
        format!("{}... ({} chars truncated)", head, s.chars().count() - max_len)
    } else {
        s.to_string()
    }
}

/// Compact, truncated rendering of a decoded body for log lines
pub fn body_summary(body: &Value) -> String {
    match body {
        Value::Null => "<empty>".to_string(),
        Value::String(s) => truncate_content(s, MAX_LOGGED_BODY_LEN),
        other => truncate_content(&other.to_string(), MAX_LOGGED_BODY_LEN),
    }
}
