//! Static File Serving
//!
//! - `/charts/<file>` serves generated chart pages from the charts directory
//! - `/` serves the front-end page from the public directory, with a
//!   built-in upload page when no front-end is installed

use axum::{
    Router,
    routing::get,
    extract::State,
    response::{IntoResponse, Response},
    http::{StatusCode, header},
};
use tower_http::services::ServeDir;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::config::StorageConfig;
use crate::storage::CHARTS_URL_PREFIX;

/// Create router for serving generated charts and the front-end
pub fn router(storage: &StorageConfig) -> Router {
    let public_dir = storage.public_dir.clone();

    if public_dir.join("index.html").exists() {
        info!(path = %public_dir.display(), "Found front-end directory");
    } else {
        warn!(path = %public_dir.display(), "Front-end index.html not found, serving built-in page");
    }

    let serve_dir = ServeDir::new(&public_dir)
        .append_index_html_on_directories(true);

    Router::new()
        .route("/", get(serve_index))
        .with_state(public_dir)
        .nest_service(CHARTS_URL_PREFIX, ServeDir::new(&storage.charts_dir))
        .fallback_service(serve_dir)
}

/// Serve the index page
async fn serve_index(State(public_dir): State<PathBuf>) -> Response {
    let content = tokio::fs::read_to_string(public_dir.join("index.html"))
        .await
        .unwrap_or_else(|_| FALLBACK_INDEX.to_string());

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
        content,
    )
        .into_response()
}

const FALLBACK_INDEX: &str = r#"<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>AI 차트 생성기</title>
    <style>
        body { font-family: 'Arial', sans-serif; max-width: 720px; margin: 40px auto; padding: 0 20px; color: #333; }
        code { background: #eee; padding: 2px 6px; border-radius: 4px; }
    </style>
</head>
<body>
    <h1>AI 차트 생성기</h1>
    <p>서버가 실행 중입니다. 프런트엔드 파일(<code>public/index.html</code>)이 설치되지 않았습니다.</p>
    <h3>API</h3>
    <ul>
        <li><code>POST /upload</code> - multipart 필드 <code>file</code></li>
        <li><code>POST /generate-chart</code> - JSON <code>{ chartType, style, dataAnalysis, feedback }</code></li>
        <li><code>GET /charts/&lt;file&gt;</code> - 생성된 차트</li>
        <li><code>GET /api/health</code> - 상태 확인</li>
    </ul>
</body>
</html>"#;
