//! LLM 服务封装
//!
//! 封装 LlmClient，与配置系统集成，对外提供 TextCompletionProvider

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::llm::{ChatMessage, ChatOptions, LlmClient, LlmError, TextCompletionProvider};
use crate::utils::RequestLogger;

/// LLM 服务
pub struct LlmService {
    client: Option<LlmClient>,
    model: String,
    temperature: f64,
    max_tokens: u32,
}

impl LlmService {
    /// 根据配置创建 LLM 服务
    ///
    /// 未配置 API Key 时服务仍可创建，调用时返回配置错误。
    pub fn from_config(config: &AppConfig) -> Self {
        let client = if config.api_key.is_empty() {
            warn!("No API key configured; model requests will fail until one is set");
            None
        } else {
            match LlmClient::new(&config.api_key, &config.base_url, config.request_timeout()) {
                Ok(client) => Some(match &config.request_log_dir {
                    Some(dir) => {
                        info!("Recording LLM requests under {}", dir.display());
                        client.with_request_logger(Arc::new(RequestLogger::new(dir)))
                    }
                    None => client,
                }),
                Err(e) => {
                    warn!("Failed to create LLM client: {}", e);
                    None
                }
            }
        };

        Self {
            client,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }

    /// 是否已配置可用的客户端
    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }
}

#[async_trait]
impl TextCompletionProvider for LlmService {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let client = self.client.as_ref().ok_or_else(|| {
            LlmError::ConfigError(
                "API Key not configured. Set GEMINI_API_KEY or LLM_API_KEY.".to_string(),
            )
        })?;

        let options = ChatOptions {
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_tokens),
        };

        client
            .complete(vec![ChatMessage::user(prompt)], &self.model, options)
            .await
    }
}
