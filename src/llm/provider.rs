use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::config::LLMConfig;
use crate::types::{AppError, AppResult, LLMRequest, LLMResponse};

#[async_trait]
pub trait LLMAdapter: Send + Sync {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse>;
}

/// Build the adapter for the configured provider
pub fn create_adapter(config: &LLMConfig) -> AppResult<Arc<dyn LLMAdapter>> {
    let adapter: Arc<dyn LLMAdapter> = match config.provider.as_str() {
        "openai" => Arc::new(crate::llm::openai::OpenAIAdapter::new(
            &config.openai_api_key,
            &config.api_base,
            Duration::from_secs(config.request_timeout_secs),
        )?),
        other => {
            return Err(AppError::InvalidRequest(format!(
                "Unsupported provider: {}",
                other
            )))
        }
    };

    Ok(adapter)
}
