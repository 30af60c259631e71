// File: dashboard/src/health/poller.rs
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::derive::{derive_view, HealthView};
use super::types::HealthSnapshot;
use crate::constants::paths;
use crate::errors::{ErrorClass, FetchError};
use crate::http::{join_url, CancelSignal, HttpFetcher};

/// Last successful poll; replaced wholesale, never patched
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthSample {
    pub snapshot: HealthSnapshot,
    pub latency_ms: u64,
    pub received_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollFailure {
    pub class: ErrorClass,
    pub message: String,
    pub status: Option<u16>,
    pub failed_at: DateTime<Utc>,
}

impl From<&FetchError> for PollFailure {
    fn from(err: &FetchError) -> Self {
        Self {
            class: err.class(),
            message: err.to_string(),
            status: err.status(),
            failed_at: Utc::now(),
        }
    }
}

/// What observers see: the last good sample plus the outcome of the latest poll
#[derive(Debug, Clone, Default)]
pub struct PollState {
    pub sample: Option<Arc<HealthSample>>,
    /// Set when the most recent poll failed; the sample above is kept
    pub last_error: Option<PollFailure>,
    pub in_flight: bool,
    /// Cycle number of the result currently applied
    pub cycle: u64,
}

/// Polls the gateway's health endpoint and publishes [`PollState`].
///
/// Every poll takes a cycle number. Only the most recently started cycle may
/// apply its outcome, so a slow poll can never overwrite a fresher one.
pub struct HealthPoller {
    url: String,
    fetcher: Arc<HttpFetcher>,
    interval: Duration,
    state: watch::Sender<PollState>,
    started_cycles: AtomicU64,
}

fn latency_ms(elapsed: Duration) -> u64 {
    (elapsed.as_secs_f64() * 1000.0).round().max(0.0) as u64
}

impl HealthPoller {
    pub fn new(gateway_url: &str, fetcher: Arc<HttpFetcher>, interval: Duration) -> Self {
        Self {
            url: join_url(gateway_url, paths::HEALTH),
            fetcher,
            interval,
            state: watch::Sender::new(PollState::default()),
            started_cycles: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state.subscribe()
    }

    pub fn current(&self) -> PollState {
        self.state.borrow().clone()
    }

    pub fn view(&self) -> HealthView {
        derive_view(&self.current(), Utc::now())
    }

    /// Poll now, outside the interval, and return the resulting view
    pub async fn refresh(&self) -> HealthView {
        let _ = self.poll_once(None).await;
        self.view()
    }

    /// Run one poll cycle. Returns whether its outcome was applied.
    pub async fn poll_once(&self, cancel: Option<&CancelSignal>) -> bool {
        let cycle = self.started_cycles.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(|state| state.in_flight = true);

        let started = Instant::now();
        let result = self
            .fetcher
            .get_typed::<HealthSnapshot>(&self.url, cancel)
            .await;
        let latency = latency_ms(started.elapsed());

        let mut applied = false;
        self.state.send_if_modified(|state| {
            if self.started_cycles.load(Ordering::SeqCst) != cycle {
                return false;
            }
            state.in_flight = false;
            if matches!(&result, Err(e) if e.is_cancelled()) {
                debug!("Health poll {} cancelled", cycle);
                return true;
            }
            state.cycle = cycle;

            match &result {
                Ok(snapshot) => {
                    if state.last_error.is_some() {
                        info!("Gateway health reachable again ({}ms)", latency);
                    }
                    state.sample = Some(Arc::new(HealthSample {
                        snapshot: snapshot.clone(),
                        latency_ms: latency,
                        received_at: Utc::now(),
                    }));
                    state.last_error = None;
                }
                Err(e) => {
                    if state.last_error.is_none() {
                        warn!("Health poll failed: {}", e);
                    } else {
                        debug!("Health poll still failing: {}", e);
                    }
                    state.last_error = Some(PollFailure::from(e));
                }
            }
            applied = true;
            true
        });

        if !applied {
            debug!("Health poll {} result dropped", cycle);
        }
        applied
    }

    /// Poll on the configured interval until `shutdown` fires
    pub async fn run(self: Arc<Self>, shutdown: CancelSignal) {
        info!(
            "Health poller started for {} (every {}s)",
            self.url,
            self.interval.as_secs()
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    self.poll_once(Some(&shutdown)).await;
                }
            }
        }

        info!("Health poller stopped");
    }
}
