// Common types and utilities for API handlers

use axum::{http::StatusCode, response::Json};
use chrono::Utc;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::errors::{ErrorClass, FlowError};
use crate::flows::{FlowKind, Workbench};
use crate::web::AppState;

// Helper type for API responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<()>>)>;

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

pub fn reject(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<ApiResponse<()>>) {
    (status, Json(ApiResponse::error(message.into())))
}

/// 400 for bad input, 409 for a dropped attempt, 502 when the gateway let us down
pub fn flow_error_status(err: &FlowError) -> StatusCode {
    match err {
        FlowError::Superseded | FlowError::Retired { .. } => StatusCode::CONFLICT,
        other => match other.class() {
            ErrorClass::Validation => StatusCode::BAD_REQUEST,
            ErrorClass::Transport | ErrorClass::Protocol => StatusCode::BAD_GATEWAY,
        },
    }
}

/// Which gateway a flow route talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowTarget {
    Local,
    Remote,
}

impl FromStr for FlowTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(FlowTarget::Local),
            "remote" => Ok(FlowTarget::Remote),
            other => Err(format!("Unknown target '{}'", other)),
        }
    }
}

impl fmt::Display for FlowTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FlowTarget::Local => "local",
            FlowTarget::Remote => "remote",
        })
    }
}

/// Workbench behind a `{target}` path segment
pub async fn resolve_workbench(
    state: &AppState,
    target: &str,
) -> Result<Arc<Workbench>, (StatusCode, Json<ApiResponse<()>>)> {
    let target: FlowTarget = target
        .parse()
        .map_err(|e: String| reject(StatusCode::NOT_FOUND, e))?;

    match target {
        FlowTarget::Local => Ok(state.local_flows.clone()),
        FlowTarget::Remote => state.remote_flows.current().await.ok_or_else(|| {
            reject(
                StatusCode::BAD_REQUEST,
                "Remote endpoint is not set; PUT /api/remote/endpoint first",
            )
        }),
    }
}

/// Resolve `/{target}/{flow}` path segments to a workbench and flow
pub async fn resolve_flow(
    state: &AppState,
    target: &str,
    flow: &str,
) -> Result<(Arc<Workbench>, FlowKind), (StatusCode, Json<ApiResponse<()>>)> {
    let kind: FlowKind = flow
        .parse()
        .map_err(|e: String| reject(StatusCode::NOT_FOUND, e))?;
    let workbench = resolve_workbench(state, target).await?;
    Ok((workbench, kind))
}
