//! Client configuration settings
//!
//! Defines all configuration structures and loading logic

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Public Spark API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.ciscospark.com/v1";

/// Main client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Spark API configuration
    pub api: ApiConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Spark API configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Bearer access token, never written out when settings are serialized
    #[serde(skip_serializing)]
    pub access_token: String,
    /// API base URL
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout: u64,
    /// User agent sent with every request
    pub user_agent: String,
}

// Keeps the token out of debug output and logs
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("access_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (text/json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

impl ApiConfig {
    /// API configuration with defaults for everything but the token
    pub fn with_token(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: 30,
            user_agent: default_user_agent(),
        }
    }
}

impl Settings {
    /// Create a new configuration instance from the environment
    pub fn new() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let settings = Self {
            api: ApiConfig {
                access_token: std::env::var("SPARK_ACCESS_TOKEN")
                    .context("SPARK_ACCESS_TOKEN environment variable not set")?,
                base_url: get_env_or_default("SPARK_BASE_URL", DEFAULT_BASE_URL),
                timeout: get_env_or_default("SPARK_TIMEOUT", "30")
                    .parse()
                    .context("Invalid timeout value")?,
                user_agent: std::env::var("SPARK_USER_AGENT").unwrap_or_else(|_| default_user_agent()),
            },
            logging: LoggingConfig {
                level: get_env_or_default("RUST_LOG", "info"),
                format: get_env_or_default("LOG_FORMAT", "text"),
            },
        };

        // Validate configuration
        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration validity
    pub fn validate(&self) -> Result<()> {
        if self.api.access_token.is_empty() {
            anyhow::bail!("Spark access token cannot be empty");
        }

        if self.api.access_token.contains(char::is_whitespace) {
            anyhow::bail!("Spark access token cannot contain whitespace characters");
        }

        if !self.api.base_url.starts_with("http") {
            anyhow::bail!("Invalid Spark base URL format, should start with 'http'");
        }

        if self.api.timeout == 0 {
            anyhow::bail!("Timeout value cannot be 0");
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            anyhow::bail!("Invalid log level: {}", self.logging.level);
        }

        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            anyhow::bail!("Invalid log format: {}", self.logging.format);
        }

        Ok(())
    }
}

fn default_user_agent() -> String {
    format!("sparkapi/{}", env!("CARGO_PKG_VERSION"))
}

/// Get environment variable or default value
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
