//! 配置查看端点

use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

use crate::config::{get_config, AppConfig};
use crate::llm::{detect_api_format, ApiFormat};
use crate::state::AppState;
use crate::utils::mask_api_key;

/// 配置响应（隐藏 api_key 的实际值）
#[derive(Serialize)]
pub struct ConfigResponse {
    /// 是否已设置 API 密钥
    pub api_key_set: bool,
    /// 脱敏后的 API 密钥
    pub api_key_masked: String,
    /// API 基础 URL
    pub base_url: String,
    /// 模型名称
    pub model: String,
    /// 根据模型名称推断的 API 格式
    pub api_format: ApiFormat,
    /// 温度参数
    pub temperature: f64,
    /// 最大 token 数
    pub max_tokens: u32,
}

impl From<AppConfig> for ConfigResponse {
    fn from(config: AppConfig) -> Self {
        Self {
            api_key_set: !config.api_key.is_empty(),
            api_key_masked: mask_api_key(&config.api_key),
            api_format: detect_api_format(&config.model),
            base_url: config.base_url,
            model: config.model,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

/// 获取当前配置
async fn get_config_handler() -> Json<ConfigResponse> {
    Json(ConfigResponse::from(get_config()))
}

/// 创建配置路由
pub fn config_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/config", get(get_config_handler))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_response_hides_key() {
        let config = AppConfig {
            api_key: "AIzaSyExampleKey1234".to_string(),
            ..AppConfig::default()
        };
        let value = serde_json::to_value(ConfigResponse::from(config)).unwrap();

        assert_eq!(value["api_key_set"], true);
        assert_eq!(value["api_key_masked"], "AIza...1234");
        assert_eq!(value["api_format"], "gemini");
        assert!(!value.to_string().contains("AIzaSyExampleKey1234"));
    }
}
