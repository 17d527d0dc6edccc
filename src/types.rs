// Type definitions shared by the LLM layer, agents and routes

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMRequest {
    pub model: String,
    pub messages: Vec<LLMMessage>,
    pub max_tokens: Option<u32>,
}

/// Content part for multimodal messages (text, images)
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type")]
pub enum ContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_base64")]
    ImageBase64 {
        base64: String,
        media_type: String, // e.g., "image/jpeg", "image/png"
    },
}

/// Message content - can be simple text or multimodal (text + images)
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Multimodal(Vec<ContentPart>),
}

impl MessageContent {
    /// Get the text content (for simple text or first text part in multimodal)
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(s) => Some(s),
            MessageContent::Multimodal(parts) => parts.iter().find_map(|p| match p {
                ContentPart::Text { text } => Some(text.as_str()),
                _ => None,
            }),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMMessage {
    pub role: String, // "user", "assistant", "system"
    pub content: MessageContent,
}

impl LLMMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: MessageContent::Text(content.into()),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// Create a user message with base64 image (for vision models)
    pub fn user_with_base64_image(
        text: impl Into<String>,
        base64: impl Into<String>,
        media_type: impl Into<String>,
    ) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Multimodal(vec![
                ContentPart::Text { text: text.into() },
                ContentPart::ImageBase64 {
                    base64: base64.into(),
                    media_type: media_type.into(),
                },
            ]),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct LLMResponse {
    pub content: String,
    pub finish_reason: String,
    pub usage: TokenUsage,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("{0}")]
    InvalidRequest(String),

    /// Request body rejected by an extractor, with the status it chose
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Rejected { status, .. } => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status_code(), Json(body)).into_response()
    }
}

pub type AppResult<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_image_message() {
        let message = LLMMessage::user_with_base64_image("describe", "aGVsbG8=", "image/jpeg");
        assert_eq!(message.role, "user");
        assert_eq!(message.content.as_text(), Some("describe"));
        match &message.content {
            MessageContent::Multimodal(parts) => assert_eq!(
                parts[1],
                ContentPart::ImageBase64 {
                    base64: "aGVsbG8=".to_string(),
                    media_type: "image/jpeg".to_string(),
                }
            ),
            other => panic!("expected multimodal content, got {:?}", other),
        }
    }

    #[test]
    fn test_text_message_is_plain() {
        let message = LLMMessage::user("plain prompt");
        assert_eq!(message.content, MessageContent::Text("plain prompt".to_string()));
        assert_eq!(message.content.as_text(), Some("plain prompt"));
    }

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::InvalidRequest("missing".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Internal("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::LLMApi("down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_rejection_keeps_status() {
        let err = AppError::Rejected {
            status: StatusCode::PAYLOAD_TOO_LARGE,
            message: "length limit exceeded".into(),
        };
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.to_string(), "length limit exceeded");
    }

    #[test]
    fn test_invalid_request_message_is_verbatim() {
        let err = AppError::InvalidRequest("파일이 업로드되지 않았습니다.".into());
        assert_eq!(err.to_string(), "파일이 업로드되지 않았습니다.");
    }
}
