use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::{error, info, warn};

use crate::agents::{ChartDataAgent, ChartRequest};
use crate::charts::render_chart_html;
use crate::models::{AppState, GenerateChartResponse};
use crate::storage::chart_url;
use crate::types::{AppError, AppResult};

pub const CHART_FAILED: &str = "차트 생성 중 오류가 발생했습니다.";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/generate-chart", post(generate_chart))
        .with_state(state)
}

async fn generate_chart(
    State(state): State<AppState>,
    request: Result<Json<ChartRequest>, JsonRejection>,
) -> AppResult<Json<GenerateChartResponse>> {
    let Json(request) = request.map_err(|rejection| {
        warn!(error = %rejection, "Invalid chart request body");
        AppError::InvalidRequest(rejection.body_text())
    })?;

    info!(chart_type = %request.chart_type, style = %request.style, "Chart generation request received");

    let chart_data = ChartDataAgent::generate(state.llm.as_ref(), &state.config.llm, &request).await;

    let generated_at = chrono::Utc::now();
    let html = render_chart_html(&request.chart_type, &request.style, &chart_data, generated_at);

    let file_name = state
        .storage
        .save_chart(&html, generated_at.timestamp_millis())
        .await
        .map_err(|e| {
            error!(error = %e, "Chart generation failed");
            AppError::Internal(CHART_FAILED.to_string())
        })?;

    let chart_url = chart_url(&file_name);
    info!(chart_url = %chart_url, "Chart generated");

    Ok(Json(GenerateChartResponse {
        success: true,
        chart_url,
        chart_data,
    }))
}
