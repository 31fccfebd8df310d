//! Route configuration and setup.
//!
//! The file routes are mounted twice with identical behavior: at the root
//! and under `/v1`.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Setup all application routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    let api = api_routes(state);

    Router::new()
        .merge(api.clone())
        .nest("/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        // The upload handler enforces the configured size limit while
        // streaming (422), so the framework's default body cap is off.
        .layer(DefaultBodyLimit::disable())
}

fn api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/readyz", get(readyz))
        .route(
            "/files",
            get(handlers::list_files).post(handlers::upload_file),
        )
        .route(
            "/files/{fileid}",
            get(handlers::download_file).delete(handlers::delete_file),
        )
        .with_state(state)
}

/// Liveness probe - process is running.
async fn readyz() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
