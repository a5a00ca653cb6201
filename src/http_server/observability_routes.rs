//! Liveness HTTP Routes
//!
//! `/` answers with a plain-text liveness message; `/health` reports the
//! service version and whether the store is connected.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use crate::storage::StoreClient;

/// Plain-text body served at `/`
pub const LIVENESS_MESSAGE: &str = "Server is up :)";

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
}

/// Create liveness and health routes
pub fn health_routes(store: Arc<StoreClient>) -> Router {
    Router::new()
        .route("/", get(liveness_handler))
        .route("/health", get(health_handler))
        .with_state(store)
}

async fn liveness_handler() -> &'static str {
    LIVENESS_MESSAGE
}

/// Health check handler
async fn health_handler(State(store): State<Arc<StoreClient>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: if store.is_connected() {
            store.backend_name().to_string()
        } else {
            "disconnected".to_string()
        },
    };

    (StatusCode::OK, Json(response))
}
