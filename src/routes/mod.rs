//! API Routes
//!
//! This module organizes all HTTP endpoints for the application:
//! - `POST /upload` - File upload and AI analysis
//! - `POST /generate-chart` - Chart data synthesis and HTML rendering
//! - `/charts/<file>` - Generated chart pages
//! - `/api/health` - Health check
//! - `/` - Static file serving (frontend)

pub mod files;
pub mod charts;
pub mod health;
pub mod static_files;

use axum::{extract::DefaultBodyLimit, Router};
use tower_http::trace::TraceLayer;
use crate::middleware::apply_cors;
use crate::models::AppState;
use tracing::info;

/// Create the main application router
///
/// API routes take precedence; everything else falls through to the
/// static front-end.
pub fn create_router(state: AppState) -> Router {
    info!("Creating application router");

    let max_upload_bytes = state.config.server.max_upload_bytes;
    let allowed_origins = state.config.server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .merge(files::router(state.clone()))
        .merge(charts::router(state.clone()))
        .merge(health::router());

    let router = Router::new()
        .merge(api_router)
        .merge(static_files::router(&state.config.storage))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http());

    apply_cors(router, &allowed_origins)
}
