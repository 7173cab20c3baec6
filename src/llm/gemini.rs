//! Gemini generateContent API 实现

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::format::build_gemini_endpoint;
use super::types::{ChatMessage, ChatOptions, LlmError};

/// Gemini 请求载荷
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize, Debug)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

/// Gemini 响应
#[derive(Deserialize, Debug)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize, Debug)]
struct GeminiCandidate {
    #[serde(default)]
    content: GeminiContent,
}

impl GeminiRequest {
    fn new(messages: &[ChatMessage], options: &ChatOptions) -> Self {
        // Gemini 使用 "model" 而不是 "assistant"
        let contents = messages
            .iter()
            .map(|msg| GeminiContent {
                role: Some(if msg.role == "assistant" {
                    "model".to_string()
                } else {
                    msg.role.clone()
                }),
                parts: vec![GeminiPart {
                    text: Some(msg.content.clone()),
                }],
            })
            .collect();

        let generation_config = if options.temperature.is_some() || options.max_tokens.is_some() {
            Some(GenerationConfig {
                temperature: options.temperature,
                max_output_tokens: options.max_tokens,
            })
        } else {
            None
        };

        Self {
            contents,
            generation_config,
        }
    }
}

/// 拼接第一个候选的全部文本片段
fn candidate_text(response: GeminiResponse) -> Option<String> {
    let candidate = response.candidates.into_iter().next()?;
    let text: String = candidate
        .content
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// 调用 Gemini API 并返回完整回复文本
pub async fn complete_gemini(
    client: &Client,
    api_key: &str,
    base_url: &str,
    messages: &[ChatMessage],
    model: &str,
    options: &ChatOptions,
) -> Result<String, LlmError> {
    let endpoint = build_gemini_endpoint(base_url, model);
    let payload = GeminiRequest::new(messages, options);

    debug!("Gemini API request: endpoint={}, model={}", endpoint, model);

    let response = client
        .post(&endpoint)
        .header("Content-Type", "application/json")
        .header("x-goog-api-key", api_key)
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let status_code = status.as_u16();
        let error_text = response.text().await.unwrap_or_default();
        error!(
            "Gemini API error: status={}, body={}",
            status_code,
            crate::utils::preview(&error_text, 500)
        );
        return Err(LlmError::ApiError {
            status: status_code,
            message: error_text,
        });
    }

    let body: GeminiResponse = response.json().await?;
    candidate_text(body).ok_or(LlmError::EmptyResponse)
}
