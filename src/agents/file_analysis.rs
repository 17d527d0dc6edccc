//! File Analysis Agent
//!
//! Classifies an uploaded file by extension and asks the model to describe
//! chart-worthy structure in it. Analysis never fails from the caller's point
//! of view: read and API errors become a localized message.
//!
//! Spreadsheets and PDFs are not decoded; their bytes are read as lossy UTF-8
//! text the same way as any other non-image file.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use tokio::fs;
use tracing::{info, warn};

use crate::config::LLMConfig;
use crate::llm::LLMAdapter;
use crate::types::{AppResult, LLMMessage, LLMRequest};

/// Maximum number of characters of file text forwarded to the model
pub const MAX_CONTENT_CHARS: usize = 2000;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp"];
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xls", "csv"];

const IMAGE_PROMPT: &str = "이 이미지에서 데이터를 추출하고 차트로 표현할 수 있는 정보를 분석해주세요. 데이터의 구조, 값, 패턴 등을 자세히 설명해주세요.";

/// Analysis strategy, selected purely from the lowercased file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStrategy {
    Image,
    Spreadsheet,
    Pdf,
    Generic,
}

impl AnalysisStrategy {
    pub fn from_file_name(file_name: &str) -> Self {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        match extension.as_deref() {
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => AnalysisStrategy::Image,
            Some(ext) if SPREADSHEET_EXTENSIONS.contains(&ext) => AnalysisStrategy::Spreadsheet,
            Some("pdf") => AnalysisStrategy::Pdf,
            _ => AnalysisStrategy::Generic,
        }
    }

    /// Message returned to the user when this strategy fails
    pub fn fallback_message(&self) -> &'static str {
        match self {
            AnalysisStrategy::Image => "이미지 분석 중 오류가 발생했습니다.",
            AnalysisStrategy::Spreadsheet => "엑셀 파일 분석 중 오류가 발생했습니다.",
            AnalysisStrategy::Pdf => "PDF 파일 분석 중 오류가 발생했습니다.",
            AnalysisStrategy::Generic => "파일 분석 중 오류가 발생했습니다.",
        }
    }
}

impl std::fmt::Display for AnalysisStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisStrategy::Image => write!(f, "image"),
            AnalysisStrategy::Spreadsheet => write!(f, "spreadsheet"),
            AnalysisStrategy::Pdf => write!(f, "pdf"),
            AnalysisStrategy::Generic => write!(f, "generic"),
        }
    }
}

pub struct FileAnalysisAgent;

impl FileAnalysisAgent {
    /// Analyze a stored file. Always returns text for the user.
    pub async fn analyze(
        llm: &dyn LLMAdapter,
        config: &LLMConfig,
        stored_path: &Path,
        original_name: &str,
    ) -> String {
        let strategy = AnalysisStrategy::from_file_name(original_name);
        info!(file = %original_name, strategy = %strategy, "Analyzing uploaded file");

        let result = match strategy {
            AnalysisStrategy::Image => Self::analyze_image(llm, config, stored_path).await,
            _ => Self::analyze_text(llm, config, stored_path, strategy).await,
        };

        match result {
            Ok(content) => {
                info!(strategy = %strategy, response_len = content.len(), "File analysis complete");
                content
            }
            Err(e) => {
                warn!(error = %e, strategy = %strategy, "File analysis failed, returning fallback");
                strategy.fallback_message().to_string()
            }
        }
    }

    async fn analyze_image(
        llm: &dyn LLMAdapter,
        config: &LLMConfig,
        stored_path: &Path,
    ) -> AppResult<String> {
        let bytes = fs::read(stored_path).await?;
        let encoded = BASE64.encode(&bytes);

        // Always labelled JPEG, whatever the real image format is.
        let request = LLMRequest {
            model: config.vision_model.clone(),
            messages: vec![LLMMessage::user_with_base64_image(IMAGE_PROMPT, encoded, "image/jpeg")],
            max_tokens: Some(config.max_tokens),
        };

        Ok(llm.create_chat_completion(&request).await?.content)
    }

    async fn analyze_text(
        llm: &dyn LLMAdapter,
        config: &LLMConfig,
        stored_path: &Path,
        strategy: AnalysisStrategy,
    ) -> AppResult<String> {
        let bytes = fs::read(stored_path).await?;
        let text = String::from_utf8_lossy(&bytes);

        let request = LLMRequest {
            model: config.text_model.clone(),
            messages: vec![LLMMessage::user(Self::text_prompt(strategy, &text))],
            max_tokens: Some(config.max_tokens),
        };

        Ok(llm.create_chat_completion(&request).await?.content)
    }

    /// Build the prompt for the non-image strategies
    pub fn text_prompt(strategy: AnalysisStrategy, content: &str) -> String {
        let subject = match strategy {
            AnalysisStrategy::Pdf => "PDF 내용",
            _ => "파일 내용",
        };

        format!(
            "다음 {}을 분석하여 차트로 표현할 수 있는 데이터 구조와 패턴을 설명해주세요:\n\n{}",
            subject,
            truncate_chars(content, MAX_CONTENT_CHARS)
        )
    }
}

/// First `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
