use chrono::{DateTime, Utc};
use serde::Serialize;

use super::poller::PollState;
use super::types::HealthSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Connecting,
    Online,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connection {
    pub state: ConnectionState,
    /// Diagnostic text for tooltips; not for decisions
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusLabel {
    Loading,
    Error,
    Refreshing,
    Ok,
}

/// Everything the status views render, computed fresh from a [`PollState`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthView {
    /// Last good snapshot, still shown while offline
    pub health: Option<HealthSnapshot>,
    pub latency_ms: Option<u64>,
    pub age_seconds: Option<u64>,
    pub last_updated: Option<DateTime<Utc>>,
    pub status_label: StatusLabel,
    pub error_message: Option<String>,
    pub is_refreshing: bool,
    pub connection: Connection,
    pub is_operational: bool,
}

pub const CONNECTING_DETAIL: &str = "Checking…";

fn online_detail(snapshot: &HealthSnapshot) -> String {
    let mut parts = vec![
        format!("cln:{}", snapshot.lightning.status),
        format!("btc:{}", snapshot.bitcoin.status),
    ];
    if !snapshot.bitcoin.chain.is_empty() {
        parts.push(format!(
            "{} @ height {}",
            snapshot.bitcoin.chain, snapshot.bitcoin.blocks
        ));
    }
    parts.join(" · ")
}

pub fn derive_view(state: &PollState, now: DateTime<Utc>) -> HealthView {
    let sample = state.sample.as_deref();
    let error_message = state.last_error.as_ref().map(|e| e.message.clone());

    let connection = match (&error_message, sample) {
        (Some(message), _) => Connection {
            state: ConnectionState::Offline,
            detail: Some(message.clone()),
        },
        (None, None) => Connection {
            state: ConnectionState::Connecting,
            detail: Some(CONNECTING_DETAIL.to_string()),
        },
        (None, Some(sample)) => Connection {
            state: ConnectionState::Online,
            detail: Some(online_detail(&sample.snapshot)),
        },
    };

    let status_label = if sample.is_none() && error_message.is_none() {
        StatusLabel::Loading
    } else if error_message.is_some() {
        StatusLabel::Error
    } else if state.in_flight {
        StatusLabel::Refreshing
    } else {
        StatusLabel::Ok
    };

    let is_operational = connection.state == ConnectionState::Online
        && sample.map(|s| s.snapshot.subsystems_ok()).unwrap_or(false);

    let age_seconds = sample.map(|s| {
        let millis = now
            .signed_duration_since(s.received_at)
            .num_milliseconds()
            .max(0);
        (millis as f64 / 1000.0).round() as u64
    });

    HealthView {
        health: sample.map(|s| s.snapshot.clone()),
        latency_ms: sample.map(|s| s.latency_ms),
        age_seconds,
        last_updated: sample.map(|s| s.received_at),
        status_label,
        error_message,
        is_refreshing: state.in_flight,
        connection,
        is_operational,
    }
}
