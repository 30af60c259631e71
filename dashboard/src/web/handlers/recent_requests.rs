// Recent gateway requests endpoints

use axum::{extract::State, http::StatusCode, response::Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::error;

use super::common::{reject, ApiResponse, ApiResult};
use crate::recent_requests::{format_age, FeedState, RecentRequestEntry};
use crate::web::AppState;

#[derive(Debug, Clone, Serialize)]
pub struct RecentRequestRow {
    #[serde(flatten)]
    pub entry: RecentRequestEntry,
    pub age: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecentRequestsView {
    pub entries: Vec<RecentRequestRow>,
    pub loaded: bool,
    pub error: Option<String>,
    pub is_clearing: bool,
    pub clear_error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

impl RecentRequestsView {
    pub fn from_state(state: FeedState, now_ms: u64) -> Self {
        Self {
            entries: state
                .entries
                .into_iter()
                .map(|entry| RecentRequestRow {
                    age: format_age(entry.ts_ms, now_ms),
                    entry,
                })
                .collect(),
            loaded: state.loaded,
            error: state.error,
            is_clearing: state.is_clearing,
            clear_error: state.clear_error,
            last_updated: state.last_updated,
        }
    }
}

fn now_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

pub async fn get_recent_requests(State(state): State<AppState>) -> ApiResult<RecentRequestsView> {
    let view = RecentRequestsView::from_state(state.recent_requests.current(), now_ms());
    Ok(Json(ApiResponse::success(view)))
}

/// Clear the gateway's log; the list is restored if the gateway refuses
pub async fn clear_recent_requests(
    State(state): State<AppState>,
) -> ApiResult<RecentRequestsView> {
    match state.recent_requests.clear().await {
        Ok(()) => {
            let view = RecentRequestsView::from_state(state.recent_requests.current(), now_ms());
            Ok(Json(ApiResponse::success(view)))
        }
        Err(e) => {
            error!("Failed to clear recent requests: {}", e);
            Err(reject(StatusCode::BAD_GATEWAY, e.to_string()))
        }
    }
}
