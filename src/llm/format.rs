//! API 格式检测和 URL 构建工具

use serde::{Deserialize, Serialize};

/// API 格式枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiFormat {
    /// Google Generative Language generateContent API
    Gemini,
    /// OpenAI Chat Completions API
    OpenAi,
    /// Anthropic Messages API
    Anthropic,
}

impl ApiFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiFormat::Gemini => "gemini",
            ApiFormat::OpenAi => "openai",
            ApiFormat::Anthropic => "anthropic",
        }
    }
}

/// 根据模型名称检测 API 格式
///
/// 规则：包含 "gemini" 使用 Gemini 格式，包含 "claude" 使用 Anthropic 格式，否则使用 OpenAI 格式
pub fn detect_api_format(model: &str) -> ApiFormat {
    let model = model.to_lowercase();
    if model.contains("gemini") {
        ApiFormat::Gemini
    } else if model.contains("claude") {
        ApiFormat::Anthropic
    } else {
        ApiFormat::OpenAi
    }
}

/// 修复 base_url
///
/// - 移除末尾斜杠
/// - 修复双斜杠（保留协议部分）
pub fn fix_base_url(base_url: &str) -> String {
    let mut url = base_url.trim_end_matches('/').to_string();

    if let Some(pos) = url.find("://") {
        let (protocol, rest) = url.split_at(pos + 3);
        let fixed_rest = rest.replace("//", "/");
        url = format!("{}{}", protocol, fixed_rest);
    }

    url
}

/// 构建 Gemini generateContent 端点
pub fn build_gemini_endpoint(base_url: &str, model: &str) -> String {
    let url = fix_base_url(base_url);

    if url.ends_with(":generateContent") {
        url
    } else if url.ends_with("/v1beta") || url.ends_with("/v1") {
        format!("{}/models/{}:generateContent", url, model)
    } else {
        format!("{}/v1beta/models/{}:generateContent", url, model)
    }
}

/// 构建 OpenAI Chat Completions 端点
pub fn build_openai_endpoint(base_url: &str) -> String {
    let url = fix_base_url(base_url);

    if url.ends_with("/chat/completions") {
        url
    } else if url.ends_with("/v1") {
        format!("{}/chat/completions", url)
    } else {
        format!("{}/v1/chat/completions", url)
    }
}

/// 构建 Anthropic Messages 端点
pub fn build_anthropic_endpoint(base_url: &str) -> String {
    let url = fix_base_url(base_url);

    if url.ends_with("/messages") {
        url
    } else if url.ends_with("/v1") {
        format!("{}/messages", url)
    } else {
        format!("{}/v1/messages", url)
    }
}
