//! 语言列表与翻译结果处理

use tracing::warn;

use super::reply_parser::extract_json_array;
use crate::models::LanguageEntry;

/// 模型回复无法解析时使用的语言列表
const FALLBACK_LANGUAGES: [(&str, &str); 6] = [
    ("hi", "Hindi"),
    ("ta", "Tamil"),
    ("te", "Telugu"),
    ("bn", "Bengali"),
    ("ml", "Malayalam"),
    ("gu", "Gujarati"),
];

pub fn fallback_languages() -> Vec<LanguageEntry> {
    FALLBACK_LANGUAGES
        .iter()
        .map(|(code, name)| LanguageEntry {
            code: code.to_string(),
            name: name.to_string(),
        })
        .collect()
}

/// 把模型回复解析为语言列表，失败时返回内置列表
pub fn languages_from_reply(reply: &str) -> Vec<LanguageEntry> {
    match extract_json_array(reply) {
        Ok(languages) => languages,
        Err(e) => {
            warn!("Could not parse language list: {}", e);
            fallback_languages()
        }
    }
}

/// 换行替换为空格并去掉首尾空白
pub fn normalize_translation(reply: &str) -> String {
    reply.replace('\n', " ").trim().to_string()
}
