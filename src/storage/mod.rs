//! Local file storage
//!
//! Uploads and generated charts are plain files in two append-only
//! directories. Names come from millisecond timestamps (plus a random suffix
//! for uploads); collisions are improbable, not prevented.

use std::path::{Path, PathBuf};

use rand::Rng;
use serde::Serialize;
use tokio::fs;
use tracing::info;

use crate::config::StorageConfig;
use crate::types::AppResult;

/// Multipart field that carries the upload
pub const UPLOAD_FIELD: &str = "file";
/// URL prefix under which generated charts are served
pub const CHARTS_URL_PREFIX: &str = "/charts";

/// A persisted upload
#[derive(Debug, Clone, Serialize)]
pub struct UploadedFile {
    pub original_name: String,
    pub stored_path: PathBuf,
    pub size_bytes: u64,
}

/// `<field>-<millis>-<suffix><ext>`, keeping the original extension
pub fn upload_file_name(field: &str, original_name: &str, millis: i64, suffix: u32) -> String {
    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default();

    format!("{}-{}-{}{}", field, millis, suffix, extension)
}

pub fn chart_file_name(millis: i64) -> String {
    format!("chart-{}.html", millis)
}

pub fn chart_url(file_name: &str) -> String {
    format!("{}/{}", CHARTS_URL_PREFIX, file_name)
}

#[derive(Debug, Clone)]
pub struct LocalStorage {
    upload_dir: PathBuf,
    charts_dir: PathBuf,
}

impl LocalStorage {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            upload_dir: config.upload_dir.clone(),
            charts_dir: config.charts_dir.clone(),
        }
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn charts_dir(&self) -> &Path {
        &self.charts_dir
    }

    /// Create the upload and chart directories if missing
    pub async fn ensure_dirs(&self) -> AppResult<()> {
        fs::create_dir_all(&self.upload_dir).await?;
        fs::create_dir_all(&self.charts_dir).await?;
        Ok(())
    }

    /// Persist an upload under a generated unique name
    pub async fn save_upload(&self, original_name: &str, bytes: &[u8]) -> AppResult<UploadedFile> {
        fs::create_dir_all(&self.upload_dir).await?;

        let suffix = rand::thread_rng().gen_range(0..1_000_000_000);
        let millis = chrono::Utc::now().timestamp_millis();
        let stored_path = self
            .upload_dir
            .join(upload_file_name(UPLOAD_FIELD, original_name, millis, suffix));

        fs::write(&stored_path, bytes).await?;
        info!(path = %stored_path.display(), size = bytes.len(), "Stored upload");

        Ok(UploadedFile {
            original_name: original_name.to_string(),
            stored_path,
            size_bytes: bytes.len() as u64,
        })
    }

    /// Write a rendered chart page, returning its file name
    pub async fn save_chart(&self, html: &str, millis: i64) -> AppResult<String> {
        fs::create_dir_all(&self.charts_dir).await?;

        let file_name = chart_file_name(millis);
        let path = self.charts_dir.join(&file_name);
        fs::write(&path, html).await?;
        info!(path = %path.display(), "Stored chart");

        Ok(file_name)
    }
}
