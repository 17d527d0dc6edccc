// Scripted adapter used by unit tests in place of a live model API

use async_trait::async_trait;
use std::sync::Mutex;

use crate::llm::LLMAdapter;
use crate::types::{AppError, AppResult, LLMRequest, LLMResponse, TokenUsage};

pub struct ScriptedLLM {
    reply: Result<String, String>,
    requests: Mutex<Vec<LLMRequest>>,
}

impl ScriptedLLM {
    pub fn replying(content: impl Into<String>) -> Self {
        Self {
            reply: Ok(content.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            reply: Err(message.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<LLMRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LLMAdapter for ScriptedLLM {
    async fn create_chat_completion(&self, request: &LLMRequest) -> AppResult<LLMResponse> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.reply {
            Ok(content) => Ok(LLMResponse {
                content: content.clone(),
                finish_reason: "stop".to_string(),
                usage: TokenUsage::default(),
            }),
            Err(message) => Err(AppError::LLMApi(message.clone())),
        }
    }
}
