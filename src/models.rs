use std::sync::Arc;

use crate::agents::ChartData;
use crate::config::Config;
use crate::llm::LLMAdapter;
use crate::storage::LocalStorage;

/// Shared, read-only application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub llm: Arc<dyn LLMAdapter>,
    pub storage: LocalStorage,
}

impl AppState {
    pub fn new(config: Config, llm: Arc<dyn LLMAdapter>) -> Self {
        let storage = LocalStorage::new(&config.storage);
        Self { config, llm, storage }
    }
}

// API Request/Response types

/// Response format for `POST /upload`
#[derive(Debug, serde::Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub message: String,
    pub file: UploadedFileInfo,
}

#[derive(Debug, serde::Serialize)]
pub struct UploadedFileInfo {
    pub name: String,
    pub size: u64,
    pub path: String,
    /// Model analysis of the file, or a localized error message
    pub content: String,
}

/// Response format for `POST /generate-chart`
#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateChartResponse {
    pub success: bool,
    pub chart_url: String,
    pub chart_data: ChartData,
}

#[derive(Debug, serde::Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}
