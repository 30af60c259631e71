// File: dashboard/src/recent_requests.rs
//! Feed of the requests the gateway saw most recently
//!
//! Clearing is optimistic: the list empties immediately, comes back if the
//! gateway refuses, and is re-read from the gateway either way.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::constants::{paths, polling};
use crate::errors::FetchError;
use crate::http::{join_url, with_query, CancelSignal, HttpFetcher, QueryValue};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentRequestEntry {
    /// Unix timestamp in milliseconds
    pub ts_ms: u64,
    pub client_addr: String,
    pub method: String,
    /// Path without the query string
    pub path: String,
    pub status: u16,
    pub ok: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FeedState {
    /// Newest first
    pub entries: Vec<RecentRequestEntry>,
    pub loaded: bool,
    pub error: Option<String>,
    pub is_clearing: bool,
    pub clear_error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// `Ns ago`, `Nm ago` or `Nh ago`, rounded down; future timestamps read `0s ago`
pub fn format_age(ts_ms: u64, now_ms: u64) -> String {
    let seconds = now_ms.saturating_sub(ts_ms) / 1000;
    if seconds < 60 {
        return format!("{}s ago", seconds);
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{}m ago", minutes);
    }
    format!("{}h ago", minutes / 60)
}

pub struct RecentRequestsFeed {
    list_url: String,
    clear_url: String,
    fetcher: Arc<HttpFetcher>,
    interval: Duration,
    state: watch::Sender<FeedState>,
    /// Bumped by every refresh and by every clear; stale refreshes are dropped
    generation: AtomicU64,
    clear_lock: Mutex<()>,
}

impl RecentRequestsFeed {
    pub fn new(
        gateway_url: &str,
        fetcher: Arc<HttpFetcher>,
        interval: Duration,
        limit: usize,
    ) -> Result<Self, FetchError> {
        let clear_url = join_url(gateway_url, paths::RECENT_REQUESTS);
        let list_url = with_query(&clear_url, [("limit", Some(QueryValue::from(limit as u64)))])?;
        Ok(Self {
            list_url,
            clear_url,
            fetcher,
            interval,
            state: watch::Sender::new(FeedState::default()),
            generation: AtomicU64::new(0),
            clear_lock: Mutex::new(()),
        })
    }

    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> FeedState {
        self.state.borrow().clone()
    }

    /// Re-read the list. Returns whether the outcome was applied.
    pub async fn refresh(&self, cancel: Option<&CancelSignal>) -> bool {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let result = self
            .fetcher
            .get_typed::<Vec<RecentRequestEntry>>(&self.list_url, cancel)
            .await;

        self.state.send_if_modified(|state| {
            if state.is_clearing || self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            match &result {
                Ok(entries) => {
                    state.entries = entries.clone();
                    state.loaded = true;
                    state.error = None;
                    state.last_updated = Some(Utc::now());
                    true
                }
                Err(e) if e.is_cancelled() => false,
                Err(e) => {
                    debug!("Recent requests refresh failed: {}", e);
                    state.error = Some(e.to_string());
                    true
                }
            }
        })
    }

    /// Empty the gateway's log, showing an empty list while the call is out
    pub async fn clear(&self) -> Result<(), FetchError> {
        let _guard = self.clear_lock.lock().await;
        self.generation.fetch_add(1, Ordering::SeqCst);

        let mut previous = Vec::new();
        self.state.send_modify(|state| {
            previous = std::mem::take(&mut state.entries);
            state.is_clearing = true;
            state.clear_error = None;
        });

        let mut result = self.fetcher.delete_json(&self.clear_url, None).await;
        if let Err(e) = &result {
            warn!(
                "Clearing recent requests failed, retrying in {}s: {}",
                polling::CLEAR_RETRY_DELAY.as_secs(),
                e
            );
            tokio::time::sleep(polling::CLEAR_RETRY_DELAY).await;
            result = self.fetcher.delete_json(&self.clear_url, None).await;
        }

        self.state.send_modify(|state| {
            state.is_clearing = false;
            if let Err(e) = &result {
                state.entries = std::mem::take(&mut previous);
                state.clear_error = Some(e.to_string());
            }
        });

        match &result {
            Ok(_) => info!("Cleared recent requests log"),
            Err(e) => warn!("Could not clear recent requests: {}", e),
        }

        self.refresh(None).await;
        result.map(|_| ())
    }

    pub async fn run(self: Arc<Self>, shutdown: CancelSignal) {
        info!(
            "Recent requests feed started for {} (every {}s)",
            self.list_url,
            self.interval.as_secs()
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    self.refresh(Some(&shutdown)).await;
                }
            }
        }

        info!("Recent requests feed stopped");
    }
}
