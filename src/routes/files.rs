use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    routing::post,
    Json, Router,
};
use tracing::{error, info, warn};

use crate::agents::FileAnalysisAgent;
use crate::models::{AppState, UploadResponse, UploadedFileInfo};
use crate::storage::UPLOAD_FIELD;
use crate::types::{AppError, AppResult};

pub const UPLOAD_SUCCESS: &str = "파일이 성공적으로 업로드되었습니다.";
pub const NO_FILE_UPLOADED: &str = "파일이 업로드되지 않았습니다.";
pub const MULTIPLE_FILES: &str = "파일은 하나만 업로드할 수 있습니다.";
pub const UPLOAD_FAILED: &str = "파일 업로드 중 오류가 발생했습니다.";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/upload", post(upload_file))
        .with_state(state)
}

/// Keep the parser's status, e.g. 413 when the body limit is hit
fn multipart_error(e: MultipartError) -> AppError {
    AppError::Rejected {
        status: e.status(),
        message: e.body_text(),
    }
}

/// Pull the single `file` part out of a multipart body
async fn read_file_field(mut multipart: Multipart) -> AppResult<(String, Vec<u8>)> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        // Text parts named `file` are form values, not uploads.
        let file_name = match (field.name(), field.file_name()) {
            (Some(UPLOAD_FIELD), Some(file_name)) => file_name.to_string(),
            _ => continue,
        };

        if upload.is_some() {
            return Err(AppError::InvalidRequest(MULTIPLE_FILES.to_string()));
        }

        let data = field.bytes().await.map_err(multipart_error)?;

        upload = Some((file_name, data.to_vec()));
    }

    upload.ok_or_else(|| AppError::InvalidRequest(NO_FILE_UPLOADED.to_string()))
}

async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<UploadResponse>> {
    info!("File upload request received");

    let multipart = multipart.map_err(|rejection| {
        warn!(error = %rejection, "Upload request is not multipart");
        AppError::InvalidRequest(NO_FILE_UPLOADED.to_string())
    })?;

    let (file_name, data) = read_file_field(multipart).await.map_err(|e| {
        warn!(error = %e, "Rejected upload");
        e
    })?;

    let stored = state
        .storage
        .save_upload(&file_name, &data)
        .await
        .map_err(|e| {
            error!(error = %e, file = %file_name, "File upload failed");
            AppError::Internal(UPLOAD_FAILED.to_string())
        })?;

    let content = FileAnalysisAgent::analyze(
        state.llm.as_ref(),
        &state.config.llm,
        &stored.stored_path,
        &stored.original_name,
    )
    .await;

    info!(file = %stored.original_name, size = stored.size_bytes, "Upload processed");

    Ok(Json(UploadResponse {
        success: true,
        message: UPLOAD_SUCCESS.to_string(),
        file: UploadedFileInfo {
            name: stored.original_name,
            size: stored.size_bytes,
            path: stored.stored_path.to_string_lossy().to_string(),
            content,
        },
    }))
}
