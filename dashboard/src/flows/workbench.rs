use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::controller::{FlowController, FlowSnapshot};
use super::forms::FlowKind;
use crate::endpoint::EndpointStore;
use crate::http::HttpFetcher;
use crate::lnurl::LnurlClient;

/// The three flow controllers for one endpoint
pub struct Workbench {
    endpoint: String,
    withdraw: FlowController,
    channel: FlowController,
    auth: FlowController,
}

impl Workbench {
    pub fn new(endpoint: &str, fetcher: Arc<HttpFetcher>) -> Self {
        let client = LnurlClient::new(endpoint, fetcher);
        Self {
            endpoint: client.endpoint().to_string(),
            withdraw: FlowController::new(FlowKind::Withdraw, client.clone()),
            channel: FlowController::new(FlowKind::Channel, client.clone()),
            auth: FlowController::new(FlowKind::Auth, client),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn controller(&self, kind: FlowKind) -> &FlowController {
        match kind {
            FlowKind::Withdraw => &self.withdraw,
            FlowKind::Channel => &self.channel,
            FlowKind::Auth => &self.auth,
        }
    }

    pub fn snapshots(&self) -> Vec<FlowSnapshot> {
        FlowKind::ALL
            .iter()
            .map(|kind| self.controller(*kind).snapshot())
            .collect()
    }

    /// Cancel every flow and stop accepting attempts; handlers still holding
    /// this workbench get [`crate::errors::FlowError::Retired`]
    pub fn retire(&self) {
        for kind in FlowKind::ALL {
            self.controller(kind).retire();
        }
    }
}

/// Workbench that follows the operator-entered remote endpoint.
///
/// A different endpoint means a brand-new [`Workbench`]; the old one is
/// retired so nothing it had in flight can land afterwards.
pub struct RemoteWorkbench {
    store: Arc<EndpointStore>,
    fetcher: Arc<HttpFetcher>,
    current: RwLock<Option<Arc<Workbench>>>,
}

impl RemoteWorkbench {
    pub fn new(store: Arc<EndpointStore>, fetcher: Arc<HttpFetcher>) -> Self {
        let endpoint = store.get();
        let current = (!endpoint.is_empty()).then(|| Arc::new(Workbench::new(&endpoint, fetcher.clone())));
        Self {
            store,
            fetcher,
            current: RwLock::new(current),
        }
    }

    pub fn store(&self) -> &EndpointStore {
        &self.store
    }

    /// `None` while the remote endpoint is unset
    pub async fn current(&self) -> Option<Arc<Workbench>> {
        self.current.read().await.clone()
    }

    /// Store a new endpoint and rebuild the workbench if it changed
    pub async fn set_endpoint(&self, raw: &str) -> String {
        let mut current = self.current.write().await;
        let normalized = self.store.set(raw).await;

        let unchanged = match current.as_ref() {
            Some(workbench) => workbench.endpoint() == normalized,
            None => normalized.is_empty(),
        };
        if unchanged {
            return normalized;
        }

        if let Some(old) = current.take() {
            info!("Retiring workbench for {}", old.endpoint());
            old.retire();
        }
        if !normalized.is_empty() {
            *current = Some(Arc::new(Workbench::new(&normalized, self.fetcher.clone())));
        }

        normalized
    }
}
