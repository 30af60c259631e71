// File: dashboard/src/config/manager.rs
use super::Config;
use crate::errors::ConfigError;
use anyhow::Result;
use std::sync::Arc;
use tokio::fs;
use tracing::info;

/// Environment variable that overrides `gateway_url` from main.toml
pub const GATEWAY_URL_ENV: &str = "GATEWAY_API_BASE_URL";

/// Loads the configuration once at startup; components receive the
/// resulting `Arc<Config>` instead of reaching for a global.
pub struct ConfigManager {
    current_config: Arc<Config>,
}

impl ConfigManager {
    pub async fn new(config_dir: &str) -> Result<Self> {
        let gateway_override = std::env::var(GATEWAY_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty());
        let config = Self::load_configuration(config_dir, gateway_override).await?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<Config> {
        self.current_config.clone()
    }

    /// Parse and validate main.toml content
    pub fn parse(content: &str, gateway_override: Option<String>) -> Result<Config, ConfigError> {
        let mut config: Config = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            reason: e.to_string(),
        })?;

        if let Some(url) = gateway_override {
            config.gateway_url = url;
        }

        config.validate()
    }

    async fn load_configuration(
        config_dir: &str,
        gateway_override: Option<String>,
    ) -> Result<Config> {
        let main_config_path = format!("{}/main.toml", config_dir);
        let content = fs::read_to_string(&main_config_path)
            .await
            .map_err(|e| ConfigError::LoadFailed {
                path: main_config_path.clone(),
                reason: e.to_string(),
            })?;

        let overridden = gateway_override.is_some();
        let config = Self::parse(&content, gateway_override)?;

        info!(
            "Loaded {} (gateway {}{}, health every {}s)",
            main_config_path,
            config.gateway_url,
            if overridden { " from environment" } else { "" },
            config.health_poll_interval_seconds
        );

        Ok(config)
    }
}
