// Gateway health endpoints

use axum::{extract::State, response::Json};
use tracing::info;

use super::common::{ApiResponse, ApiResult};
use crate::health::HealthView;
use crate::web::AppState;

/// Latest derived health view; never touches the gateway
pub async fn get_health(State(state): State<AppState>) -> ApiResult<HealthView> {
    Ok(Json(ApiResponse::success(state.health_poller.view())))
}

/// Poll the gateway now (for the refresh button)
pub async fn refresh_health(State(state): State<AppState>) -> ApiResult<HealthView> {
    info!("Manual health refresh requested");
    let view = state.health_poller.refresh().await;
    Ok(Json(ApiResponse::success(view)))
}
