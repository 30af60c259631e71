// File: dashboard/src/web/mod.rs
pub mod handlers;
pub mod server;

pub use server::{create_router, start_web_server};

use std::sync::Arc;

use crate::config::Config;
use crate::flows::{RemoteWorkbench, Workbench};
use crate::health::HealthPoller;
use crate::recent_requests::RecentRequestsFeed;

// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub health_poller: Arc<HealthPoller>,
    pub recent_requests: Arc<RecentRequestsFeed>,
    // Flows against the configured local gateway
    pub local_flows: Arc<Workbench>,
    // Flows against whatever endpoint the operator entered
    pub remote_flows: Arc<RemoteWorkbench>,
}

impl AppState {
    pub fn new(
        config: Arc<Config>,
        health_poller: Arc<HealthPoller>,
        recent_requests: Arc<RecentRequestsFeed>,
        local_flows: Arc<Workbench>,
        remote_flows: Arc<RemoteWorkbench>,
    ) -> Self {
        Self {
            config,
            health_poller,
            recent_requests,
            local_flows,
            remote_flows,
        }
    }
}
