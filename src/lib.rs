// Oxidized Charts - AI file analysis and chart generation backend

pub mod config;
pub mod models;
pub mod types;
pub mod agents;
pub mod llm;
pub mod charts;    // HTML chart rendering (ECharts)
pub mod storage;   // Local upload and chart directories
pub mod routes;
pub mod middleware;
pub mod utils;

// Re-exports for convenience
pub use config::Config;
pub use models::AppState;

pub fn create_router(state: AppState) -> axum::Router {
    routes::create_router(state)
}
