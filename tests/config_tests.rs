//! Configuration module unit tests

use sparkapi::config::settings::{ApiConfig, LoggingConfig, Settings, DEFAULT_BASE_URL};
use std::env;
use std::sync::Mutex;

// Tests in this binary share the process environment
static ENV_LOCK: Mutex<()> = Mutex::new(());

const VARS: [&str; 6] = [
    "SPARK_ACCESS_TOKEN",
    "SPARK_BASE_URL",
    "SPARK_TIMEOUT",
    "SPARK_USER_AGENT",
    "RUST_LOG",
    "LOG_FORMAT",
];

/// Setup test environment variables
fn setup_test_env() {
    env::set_var("SPARK_ACCESS_TOKEN", "my_bot_token");
    env::set_var("SPARK_BASE_URL", "http://127.0.0.1:9000/v1");
    env::set_var("SPARK_TIMEOUT", "15");
    env::set_var("RUST_LOG", "debug");
    env::set_var("LOG_FORMAT", "json");
}

/// Clean up test environment variables
fn cleanup_test_env() {
    for var in &VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_settings_creation_with_valid_env() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_test_env();
    setup_test_env();

    let settings = Settings::new().unwrap();
    assert_eq!(settings.api.access_token, "my_bot_token");
    assert_eq!(settings.api.base_url, "http://127.0.0.1:9000/v1");
    assert_eq!(settings.api.timeout, 15);
    assert!(settings.api.user_agent.starts_with("sparkapi/"));
    assert_eq!(settings.logging.level, "debug");
    assert_eq!(settings.logging.format, "json");

    cleanup_test_env();
}

#[test]
fn test_settings_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_test_env();
    env::set_var("SPARK_ACCESS_TOKEN", "my_bot_token");

    let settings = Settings::new().unwrap();
    assert_eq!(settings.api.base_url, DEFAULT_BASE_URL);
    assert_eq!(settings.api.timeout, 30);
    assert_eq!(settings.logging.level, "info");
    assert_eq!(settings.logging.format, "text");

    cleanup_test_env();
}

#[test]
fn test_settings_creation_missing_token() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_test_env();

    let error = Settings::new().unwrap_err();
    assert!(error.to_string().contains("SPARK_ACCESS_TOKEN"));
}

#[test]
fn test_settings_validation_invalid_timeout() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_test_env();
    setup_test_env();

    env::set_var("SPARK_TIMEOUT", "0");
    assert!(Settings::new().is_err());

    env::set_var("SPARK_TIMEOUT", "soon");
    let error = Settings::new().unwrap_err();
    assert!(error.to_string().contains("Invalid timeout value"));

    cleanup_test_env();
}

#[test]
fn test_settings_validation_invalid_log_level() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_test_env();
    setup_test_env();
    env::set_var("RUST_LOG", "verbose");

    let error = Settings::new().unwrap_err();
    assert!(error.to_string().contains("Invalid log level"));

    cleanup_test_env();
}

#[test]
fn test_manual_settings_validation() {
    let settings = Settings {
        api: ApiConfig::with_token("my_bot_token"),
        logging: LoggingConfig::default(),
    };
    assert!(settings.validate().is_ok());

    let mut empty = settings.clone();
    empty.api.access_token = String::new();
    assert!(empty.validate().is_err());

    let mut bad_url = settings;
    bad_url.api.base_url = "api.ciscospark.com".to_string();
    assert!(bad_url.validate().is_err());
}

#[test]
fn test_serialized_settings_leave_out_token() {
    let settings = Settings {
        api: ApiConfig::with_token("my_bot_token"),
        logging: LoggingConfig::default(),
    };

    let value = serde_json::to_value(&settings).unwrap();
    assert!(value["api"].get("access_token").is_none());
    assert_eq!(value["api"]["base_url"], DEFAULT_BASE_URL);
    assert!(!value.to_string().contains("my_bot_token"));
}
