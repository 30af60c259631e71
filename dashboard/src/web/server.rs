// File: dashboard/src/web/server.rs
use crate::http::CancelSignal;
use crate::web::{handlers, AppState};
use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Serve the API until `shutdown` fires
pub async fn start_web_server(state: AppState, shutdown: CancelSignal) -> Result<()> {
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        // === HEALTH ROUTES ===
        .route("/api/health", get(handlers::get_health))
        .route("/api/health/refresh", post(handlers::refresh_health))
        // === RECENT REQUESTS ROUTES ===
        .route(
            "/api/recent-requests",
            get(handlers::get_recent_requests).delete(handlers::clear_recent_requests),
        )
        // === REMOTE ENDPOINT ROUTES ===
        .route(
            "/api/remote/endpoint",
            get(handlers::get_remote_endpoint).put(handlers::set_remote_endpoint),
        )
        // === FLOW ROUTES ===
        .route("/api/flows/{target}", get(handlers::list_flows))
        .route("/api/flows/{target}/{flow}", get(handlers::get_flow))
        .route(
            "/api/flows/{target}/{flow}/request",
            post(handlers::create_flow_request),
        )
        .route(
            "/api/flows/{target}/{flow}/callback",
            post(handlers::invoke_flow_callback),
        )
        .route(
            "/api/flows/{target}/{flow}/cancel",
            post(handlers::cancel_flow),
        );

    // === STATIC FILES ===
    let router = match state.config.static_dir.as_deref() {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
