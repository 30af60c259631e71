// Remote gateway endpoint selection

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::common::{ApiResponse, ApiResult};
use crate::config::PageScheme;
use crate::web::AppState;

#[derive(Debug, Deserialize)]
pub struct SetEndpointBody {
    #[serde(default)]
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EndpointInfo {
    /// Empty when unset
    pub endpoint: String,
    pub is_set: bool,
    pub scheme: PageScheme,
}

fn endpoint_info(state: &AppState) -> EndpointInfo {
    let store = state.remote_flows.store();
    EndpointInfo {
        endpoint: store.get(),
        is_set: store.is_set(),
        scheme: store.scheme(),
    }
}

pub async fn get_remote_endpoint(State(state): State<AppState>) -> ApiResult<EndpointInfo> {
    Ok(Json(ApiResponse::success(endpoint_info(&state))))
}

/// Normalize and store the endpoint; an empty value unsets it
pub async fn set_remote_endpoint(
    State(state): State<AppState>,
    Json(body): Json<SetEndpointBody>,
) -> ApiResult<EndpointInfo> {
    let normalized = state.remote_flows.set_endpoint(&body.endpoint).await;
    info!(
        "Remote endpoint set to '{}' (typed '{}')",
        normalized,
        body.endpoint.trim()
    );
    Ok(Json(ApiResponse::success(endpoint_info(&state))))
}
