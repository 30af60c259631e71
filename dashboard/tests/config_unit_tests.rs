//! Unit tests for configuration parsing and validation
//!
//! These tests verify that main.toml is parsed correctly
//! and validation rules are enforced.

mod common;

use dashboard::config::{ConfigManager, PageScheme};
use dashboard::errors::ConfigError;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_parse_main_config() {
    let main_toml = r#"
host = "127.0.0.1"
port = 9000
gateway_url = "http://10.0.0.2:3000/"
page_scheme = "https"
health_poll_interval_seconds = 10
recent_requests_poll_interval_seconds = 2
recent_requests_limit = 30
database_path = "/var/lib/dashboard/settings.db"
request_timeout_seconds = 20
static_dir = "ui/dist"
    "#;

    let config = ConfigManager::parse(main_toml, None).unwrap();

    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 9000);
    assert_eq!(config.gateway_url, "http://10.0.0.2:3000");
    assert_eq!(config.page_scheme, PageScheme::Https);
    assert_eq!(config.health_poll_interval(), Duration::from_secs(10));
    assert_eq!(config.recent_requests_poll_interval(), Duration::from_secs(2));
    assert_eq!(config.recent_requests_limit, 30);
    assert_eq!(config.database_path, "/var/lib/dashboard/settings.db");
    assert_eq!(config.request_timeout(), Some(Duration::from_secs(20)));
    assert_eq!(config.static_dir.as_deref(), Some("ui/dist"));
}

#[test]
fn test_defaults_applied() {
    let config = ConfigManager::parse(r#"gateway_url = "gw.local:3000""#, None).unwrap();

    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 8096);
    assert_eq!(config.gateway_url, "http://gw.local:3000");
    assert_eq!(config.page_scheme, PageScheme::Http);
    assert_eq!(config.health_poll_interval(), Duration::from_secs(5));
    assert_eq!(config.recent_requests_poll_interval(), Duration::from_secs(3));
    assert_eq!(config.recent_requests_limit, 15);
    assert_eq!(config.database_path, "data/dashboard.db");
    assert_eq!(config.request_timeout(), None);
    assert_eq!(config.static_dir, None);
}

#[test]
fn test_gateway_override_wins() {
    let config = ConfigManager::parse(
        r#"gateway_url = "http://from-file:3000""#,
        Some("https://from-env:8443/".to_string()),
    )
    .unwrap();
    assert_eq!(config.gateway_url, "https://from-env:8443");
}

#[test]
fn test_missing_gateway_rejected() {
    let err = ConfigManager::parse("port = 8096", None).unwrap_err();
    assert!(matches!(err, ConfigError::MissingRequired { ref field } if field == "gateway_url"));
}

#[test]
fn test_zero_interval_rejected() {
    let err = ConfigManager::parse(
        r#"
gateway_url = "http://gw:3000"
health_poll_interval_seconds = 0
"#,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "health_poll_interval_seconds"));
}

#[test]
fn test_limit_out_of_range_rejected() {
    let err = ConfigManager::parse(
        r#"
gateway_url = "http://gw:3000"
recent_requests_limit = 51
"#,
        None,
    )
    .unwrap_err();
    assert!(err.to_string().contains("recent_requests_limit"));
}

#[test]
fn test_unknown_scheme_is_parse_error() {
    let err = ConfigManager::parse(
        r#"
gateway_url = "http://gw:3000"
page_scheme = "gopher"
"#,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[tokio::test]
async fn test_load_from_directory() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("main.toml"),
        "gateway_url = \"http://127.0.0.1:3000\"\nport = 8200\n",
    )
    .unwrap();

    let manager = ConfigManager::new(temp_dir.path().to_str().unwrap())
        .await
        .unwrap();
    let config = manager.get_current_config();
    assert_eq!(config.port, 8200);
}

#[tokio::test]
async fn test_missing_file_reported() {
    let temp_dir = TempDir::new().unwrap();
    let err = ConfigManager::new(temp_dir.path().to_str().unwrap())
        .await
        .err()
        .unwrap();
    assert!(err.to_string().contains("main.toml"));
}
