//! 模型回复解析
//!
//! 模型被要求只返回 JSON 数组，但实际回复经常带有说明文字或 Markdown 代码块，
//! 所以取第一个 '[' 到最后一个 ']' 之间的内容再解析。

use serde::de::DeserializeOwned;
use thiserror::Error;

/// 回复解析错误
#[derive(Debug, Error)]
pub enum ReplyParseError {
    /// 回复中没有成对的方括号
    #[error("reply does not contain a JSON array")]
    MissingBrackets,

    /// 方括号内的内容不是合法的目标 JSON
    #[error("invalid JSON array: {0}")]
    Json(#[from] serde_json::Error),
}

/// 定位第一个 '[' 与最后一个 ']'（包含两端）
pub fn find_array_span(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// 从模型回复中提取并解析 JSON 数组
pub fn extract_json_array<T: DeserializeOwned>(text: &str) -> Result<Vec<T>, ReplyParseError> {
    let span = find_array_span(text).ok_or(ReplyParseError::MissingBrackets)?;
    Ok(serde_json::from_str(span)?)
}
