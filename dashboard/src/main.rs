// File: dashboard/src/main.rs
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use dashboard::flows::{RemoteWorkbench, Workbench};
use dashboard::http::{cancel_pair, HttpFetcher};
use dashboard::web::{start_web_server, AppState};
use dashboard::{ConfigManager, Database, EndpointStore, HealthPoller, RecentRequestsFeed};

/// Directory holding main.toml, overridable for packaged installs
const CONFIG_DIR_ENV: &str = "DASHBOARD_CONFIG_DIR";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with reduced verbosity
    let env_filter = EnvFilter::from_default_env()
        .add_directive("dashboard=info".parse()?)
        .add_directive("tower_http=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?)
        .add_directive("sqlx=warn".parse()?);

    fmt().with_env_filter(env_filter).init();

    info!("Starting LNURL gateway dashboard");

    // Load configuration
    let config_dir = std::env::var(CONFIG_DIR_ENV).unwrap_or_else(|_| "config".to_string());
    let config_manager = ConfigManager::new(&config_dir).await?;
    let config = config_manager.get_current_config();
    info!(
        "Configuration loaded: gateway {}, listening on {}:{}",
        config.gateway_url, config.host, config.port
    );

    // Settings database is optional; without it the remote endpoint is not remembered
    let database = match Database::new(&config.database_path).await {
        Ok(db) => {
            info!("Settings database initialized");
            Some(Arc::new(db))
        }
        Err(e) => {
            warn!(
                "Settings database unavailable, remote endpoint will not persist: {}",
                e
            );
            None
        }
    };

    let fetcher = Arc::new(HttpFetcher::new(config.request_timeout())?);

    let endpoint_store = Arc::new(EndpointStore::load(database, config.page_scheme).await);
    let remote_flows = Arc::new(RemoteWorkbench::new(endpoint_store, fetcher.clone()));
    let local_flows = Arc::new(Workbench::new(&config.gateway_url, fetcher.clone()));

    let health_poller = Arc::new(HealthPoller::new(
        &config.gateway_url,
        fetcher.clone(),
        config.health_poll_interval(),
    ));
    let recent_requests = Arc::new(RecentRequestsFeed::new(
        &config.gateway_url,
        fetcher.clone(),
        config.recent_requests_poll_interval(),
        config.recent_requests_limit,
    )?);

    let (shutdown_handle, shutdown) = cancel_pair();

    // Start background pollers
    let health_task = tokio::spawn(health_poller.clone().run(shutdown.clone()));
    let feed_task = tokio::spawn(recent_requests.clone().run(shutdown.clone()));
    info!("Background pollers started");

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => error!("Failed to listen for shutdown signal: {}", e),
        }
        shutdown_handle.cancel();
    });

    let state = AppState::new(
        config.clone(),
        health_poller,
        recent_requests,
        local_flows,
        remote_flows,
    );

    if let Err(e) = start_web_server(state, shutdown).await {
        error!("Web server failed: {}", e);
        health_task.abort();
        feed_task.abort();
        return Err(e);
    }

    for task in [health_task, feed_task] {
        if let Err(e) = task.await {
            error!("Background task ended abnormally: {}", e);
        }
    }

    info!("Dashboard stopped");
    Ok(())
}
