//! Prompt 构建服务
//!
//! 负责为景点推荐、语言列表和翻译构建发送给模型的提示词

/// Prompt 服务
pub struct PromptService;

impl PromptService {
    /// 创建新的 Prompt 服务
    pub fn new() -> Self {
        Self
    }

    /// 城市景点推荐提示词
    pub fn build_places_prompt(&self, city: &str) -> String {
        format!(
            r#"You are an AI travel and heritage assistant.
List 3 to 5 famous tourist or heritage places in {city}, India.
Return only JSON array like:
[
  {{"place": "PLACE NAME", "tagline": "IMPACTFUL LINE"}}
]"#
        )
    }

    /// 印度语言列表提示词
    pub fn build_languages_prompt(&self) -> String {
        r#"List all official and major Indian languages in JSON format like:
[
  {"code": "hi", "name": "Hindi"},
  {"code": "ta", "name": "Tamil"},
  {"code": "te", "name": "Telugu"}
]"#
        .to_string()
    }

    /// 翻译提示词
    pub fn build_translation_prompt(&self, text: &str, language: &str) -> String {
        format!(
            r#"Translate the following English text into {language} (an Indian language).
Return only translated text without explanations or labels.
Text: """{text}""""#
        )
    }
}

impl Default for PromptService {
    fn default() -> Self {
        Self::new()
    }
}
