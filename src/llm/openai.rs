// OpenAI chat completions adapter
// API Reference: https://platform.openai.com/docs/api-reference/chat/create
//
// Speaks the wire format directly over reqwest so the base URL can point at
// any OpenAI-compatible endpoint (or a local mock server in tests).

use crate::llm::provider::LLMAdapter;
use crate::types::{
    AppError, AppResult, ContentPart, LLMMessage, LLMRequest, LLMResponse, MessageContent,
    TokenUsage,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub struct OpenAIAdapter {
    client: Client,
    api_key: String,
    api_base: String,
}

// Request types for the chat completions API
#[derive(Serialize)]
struct OpenAIChatRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct OpenAIMessage {
    role: String,
    content: OpenAIMessageContent,
}

#[derive(Serialize)]
#[serde(untagged)]
enum OpenAIMessageContent {
    Text(String),
    Parts(Vec<OpenAIContentPart>),
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum OpenAIContentPart {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: OpenAIImageUrl },
}

#[derive(Serialize)]
struct OpenAIImageUrl {
    url: String,
}

// Response types
#[derive(Deserialize)]
struct OpenAIChatResponse {
    choices: Vec<OpenAIChoice>,
    #[serde(default)]
    usage: Option<OpenAIUsage>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct OpenAIResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Deserialize)]
struct OpenAIErrorResponse {
    error: OpenAIError,
}

#[derive(Deserialize)]
struct OpenAIError {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

impl OpenAIAdapter {
    /// Create an adapter for `api_base` (e.g. `https://api.openai.com/v1`).
    /// Every request is bounded by `timeout`.
    pub fn new(api_key: &str, api_base: &str, timeout: Duration) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base)
    }

    fn convert_message(msg: &LLMMessage) -> OpenAIMessage {
        let content = match &msg.content {
            MessageContent::Text(text) => OpenAIMessageContent::Text(text.clone()),
            MessageContent::Multimodal(parts) => OpenAIMessageContent::Parts(
                parts
                    .iter()
                    .map(|part| match part {
                        ContentPart::Text { text } => OpenAIContentPart::Text { text: text.clone() },
                        ContentPart::ImageBase64 { base64, media_type } => {
                            OpenAIContentPart::ImageUrl {
                                image_url: OpenAIImageUrl {
                                    url: format!("data:{};base64,{}", media_type, base64),
                                },
                            }
                        }
                    })
                    .collect(),
            ),
        };

        OpenAIMessage {
            role: msg.role.clone(),
            content,
        }
    }
}

#[async_trait]
impl LLMAdapter for OpenAIAdapter {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        if self.api_key.is_empty() {
            return Err(AppError::LLMApi("OPENAI_API_KEY is not configured".to_string()));
        }

        let body = OpenAIChatRequest {
            model: request.model.clone(),
            messages: request.messages.iter().map(Self::convert_message).collect(),
            max_tokens: request.max_tokens,
        };

        debug!(model = %request.model, messages = body.messages.len(), "Sending chat completion");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LLMApi(format!("OpenAI request failed: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(error_response) = serde_json::from_str::<OpenAIErrorResponse>(&error_text) {
                return Err(AppError::LLMApi(format!(
                    "OpenAI API error ({}): {} (code: {:?})",
                    status, error_response.error.message, error_response.error.code
                )));
            }

            return Err(AppError::LLMApi(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let chat_response: OpenAIChatResponse = response
            .json()
            .await
            .map_err(|e| AppError::LLMApi(format!("Failed to parse OpenAI response: {}", e)))?;

        let choice = chat_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| AppError::LLMApi("OpenAI returned no choices".to_string()))?;

        let usage = chat_response
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        Ok(LLMResponse {
            content: choice.message.content.unwrap_or_default(),
            finish_reason: choice.finish_reason.unwrap_or_else(|| "stop".to_string()),
            usage,
        })
    }
}
