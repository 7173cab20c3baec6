//! 统一 LLM 客户端

use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

use super::anthropic::complete_anthropic;
use super::format::{
    build_anthropic_endpoint, build_gemini_endpoint, build_openai_endpoint, detect_api_format,
    ApiFormat,
};
use super::gemini::complete_gemini;
use super::openai::complete_openai;
use super::types::{ChatMessage, ChatOptions, LlmError};
use crate::utils::RequestLogger;

/// 统一 LLM 客户端
///
/// 支持 Gemini、OpenAI 和 Anthropic API 格式，根据模型名称自动选择
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
    request_logger: Option<Arc<RequestLogger>>,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(LlmError::ConfigError("API Key is required".to_string()));
        }

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(LlmError::HttpError)?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into(),
            request_logger: None,
        })
    }

    /// 附加请求日志记录器
    pub fn with_request_logger(mut self, logger: Arc<RequestLogger>) -> Self {
        self.request_logger = Some(logger);
        self
    }

    fn endpoint_for(&self, api_format: ApiFormat, model: &str) -> String {
        match api_format {
            ApiFormat::Gemini => build_gemini_endpoint(&self.base_url, model),
            ApiFormat::OpenAi => build_openai_endpoint(&self.base_url),
            ApiFormat::Anthropic => build_anthropic_endpoint(&self.base_url),
        }
    }

    /// 单轮请求，返回完整回复文本（自动检测 API 格式）
    pub async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        model: &str,
        options: ChatOptions,
    ) -> Result<String, LlmError> {
        let api_format = detect_api_format(model);
        info!("LLM request: model={}, api_format={:?}", model, api_format);

        let log_entry = self.request_logger.as_ref().map(|logger| {
            let prompt = messages.last().map(|m| m.content.as_str()).unwrap_or_default();
            logger.begin(
                api_format.as_str(),
                &self.endpoint_for(api_format, model),
                model,
                &self.api_key,
                prompt,
            )
        });
        let start_time = Instant::now();

        let result = match api_format {
            ApiFormat::Gemini => {
                complete_gemini(&self.client, &self.api_key, &self.base_url, &messages, model, &options)
                    .await
            }
            ApiFormat::OpenAi => {
                complete_openai(&self.client, &self.api_key, &self.base_url, &messages, model, &options)
                    .await
            }
            ApiFormat::Anthropic => {
                complete_anthropic(&self.client, &self.api_key, &self.base_url, &messages, model, &options)
                    .await
            }
        };

        if let (Some(logger), Some(entry)) = (self.request_logger.as_ref(), log_entry) {
            match &result {
                Ok(text) => logger.log_success(entry, start_time, text),
                Err(e) => logger.log_error(entry, start_time, e.kind(), &e.to_string(), e.status_code()),
            }
        }

        result
    }
}
