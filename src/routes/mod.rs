//! API Routes
//!
//! This module organizes all HTTP endpoints for the application:
//! - `POST /upload` - Document upload and triage
//! - `GET /uploads` - List processed uploads, newest first
//! - `GET /uploads/{id}` / `DELETE /uploads/{id}` - Single-record retrieval/removal
//! - `GET /api/health` - Health check
//!
//! The upload paths are unprefixed for compatibility with existing clients.

pub mod health;
pub mod uploads;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::middleware::cors::cors_layer;
use crate::models::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let cors = cors_layer(&state.config.server.cors_allowed_origins);

    Router::new()
        .merge(uploads::router(state.clone()))
        .merge(health::router(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
