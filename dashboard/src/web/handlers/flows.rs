// LNURL flow endpoints, for the local gateway and the remote one

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use super::common::{
    flow_error_status, reject, resolve_flow, resolve_workbench, ApiResponse, ApiResult,
};
use crate::flows::{FlowForm, FlowSnapshot};
use crate::http::parse_maybe_json;
use crate::lnurl::LnurlRequest;
use crate::web::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct CreateRequestBody {
    #[serde(default)]
    pub action: Option<String>,
}

/// State of all three flows on one target
pub async fn list_flows(
    Path(target): Path<String>,
    State(state): State<AppState>,
) -> ApiResult<Vec<FlowSnapshot>> {
    let workbench = resolve_workbench(&state, &target).await?;
    Ok(Json(ApiResponse::success(workbench.snapshots())))
}

/// Current create and invoke state of one flow
pub async fn get_flow(
    Path((target, flow)): Path<(String, String)>,
    State(state): State<AppState>,
) -> ApiResult<FlowSnapshot> {
    let (workbench, kind) = resolve_flow(&state, &target, &flow).await?;
    let snapshot = workbench.controller(kind).snapshot();
    Ok(Json(ApiResponse::success(snapshot)))
}

/// Fetch a new request (`k1` + callback) from the gateway
pub async fn create_flow_request(
    Path((target, flow)): Path<(String, String)>,
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<LnurlRequest> {
    let (workbench, kind) = resolve_flow(&state, &target, &flow).await?;
    let controller = workbench.controller(kind);

    let body: CreateRequestBody = match parse_maybe_json(&String::from_utf8_lossy(&body)) {
        Value::Null => CreateRequestBody::default(),
        value => serde_json::from_value(value)
            .map_err(|e| reject(StatusCode::BAD_REQUEST, format!("Invalid request body: {}", e)))?,
    };

    if controller.is_creating() {
        return Err(reject(
            StatusCode::CONFLICT,
            format!("A {} request is already being created", kind),
        ));
    }

    info!("Creating {} request on {} ({})", kind, target, workbench.endpoint());
    match controller.create_request(body.action).await {
        Ok(request) => Ok(Json(ApiResponse::success(request))),
        Err(e) => {
            warn!("Failed to create {} request on {}: {}", kind, target, e);
            Err(reject(flow_error_status(&e), e.to_string()))
        }
    }
}

/// Invoke the held request's callback with the operator's form
pub async fn invoke_flow_callback(
    Path((target, flow)): Path<(String, String)>,
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Value> {
    let (workbench, kind) = resolve_flow(&state, &target, &flow).await?;
    let controller = workbench.controller(kind);

    let value = parse_maybe_json(&String::from_utf8_lossy(&body));
    let form = FlowForm::from_value(kind, value)
        .map_err(|e| reject(StatusCode::BAD_REQUEST, format!("Invalid {} form: {}", kind, e)))?;

    if controller.is_invoking() {
        return Err(reject(
            StatusCode::CONFLICT,
            format!("A {} callback is already in flight", kind),
        ));
    }

    match controller.invoke_callback(form).await {
        Ok(response) => Ok(Json(ApiResponse::success(response))),
        Err(e) => {
            warn!("{} callback on {} failed: {}", kind, target, e);
            Err(reject(flow_error_status(&e), e.to_string()))
        }
    }
}

/// Abort whatever the flow has in flight
pub async fn cancel_flow(
    Path((target, flow)): Path<(String, String)>,
    State(state): State<AppState>,
) -> ApiResult<FlowSnapshot> {
    let (workbench, kind) = resolve_flow(&state, &target, &flow).await?;
    let controller = workbench.controller(kind);

    controller.cancel();
    info!("Cancelled {} flow on {}", kind, target);
    Ok(Json(ApiResponse::success(controller.snapshot())))
}
