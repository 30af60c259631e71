// File: dashboard/src/config/mod.rs
pub mod manager;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

pub use manager::ConfigManager;

use crate::constants::{polling, web};
use crate::endpoint::normalize_endpoint;
use crate::errors::ConfigError;

/// Scheme assumed for endpoints typed without one
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageScheme {
    #[default]
    Http,
    Https,
}

impl PageScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageScheme::Http => "http",
            PageScheme::Https => "https",
        }
    }
}

impl fmt::Display for PageScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Base URL of the local gateway (health, recent requests, local flows)
    #[serde(default)]
    pub gateway_url: String,
    #[serde(default)]
    pub page_scheme: PageScheme,
    #[serde(default = "default_health_interval")]
    pub health_poll_interval_seconds: u64,
    #[serde(default = "default_recent_requests_interval")]
    pub recent_requests_poll_interval_seconds: u64,
    #[serde(default = "default_recent_requests_limit")]
    pub recent_requests_limit: usize,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    pub request_timeout_seconds: Option<u64>,
    /// Directory holding the built front end, served at `/`
    pub static_dir: Option<String>,
}

fn default_host() -> String {
    web::DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    web::DEFAULT_PORT
}

fn default_health_interval() -> u64 {
    polling::HEALTH_INTERVAL_SECONDS
}

fn default_recent_requests_interval() -> u64 {
    polling::RECENT_REQUESTS_INTERVAL_SECONDS
}

fn default_recent_requests_limit() -> usize {
    polling::RECENT_REQUESTS_LIMIT
}

fn default_database_path() -> String {
    "data/dashboard.db".to_string()
}

impl Config {
    /// Normalize the gateway URL and reject values the dashboard cannot run with
    pub fn validate(mut self) -> Result<Self, ConfigError> {
        let gateway_url = normalize_endpoint(&self.gateway_url, self.page_scheme);
        if gateway_url.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "gateway_url".to_string(),
            });
        }
        if let Err(e) = reqwest::Url::parse(&gateway_url) {
            return Err(ConfigError::InvalidValue {
                field: "gateway_url".to_string(),
                reason: format!("'{}' is not a valid URL: {}", gateway_url, e),
            });
        }
        self.gateway_url = gateway_url;

        if self.health_poll_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "health_poll_interval_seconds".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.recent_requests_poll_interval_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "recent_requests_poll_interval_seconds".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if !(1..=50).contains(&self.recent_requests_limit) {
            return Err(ConfigError::InvalidValue {
                field: "recent_requests_limit".to_string(),
                reason: "must be between 1 and 50".to_string(),
            });
        }

        Ok(self)
    }

    pub fn health_poll_interval(&self) -> Duration {
        Duration::from_secs(self.health_poll_interval_seconds)
    }

    pub fn recent_requests_poll_interval(&self) -> Duration {
        Duration::from_secs(self.recent_requests_poll_interval_seconds)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs)
    }
}
