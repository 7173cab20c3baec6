//! 应用配置管理
//!
//! 配置按以下顺序叠加：默认值 → 可执行文件同级的 config.json → 环境变量（含 .env）。
//! 启动后配置只读，通过全局单例访问。

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

/// API 密钥的环境变量，按优先级排列
const API_KEY_VARS: [&str; 3] = ["GEMINI_API_KEY", "GOOGLE_API_KEY", "LLM_API_KEY"];

/// 获取配置文件路径
fn get_config_path() -> PathBuf {
    // 配置文件位于可执行文件同级目录
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("config.json")
}

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// LLM API 密钥
    #[serde(default)]
    pub api_key: String,

    /// LLM API 基础 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 模型名称
    #[serde(default = "default_model")]
    pub model: String,

    /// 温度参数 (0.0 - 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// 最大 token 数
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// 上游请求总超时（秒）
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// LLM 请求日志目录，未设置时不记录
    #[serde(default)]
    pub request_log_dir: Option<PathBuf>,

    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_request_timeout_secs() -> u64 {
    120
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout_secs: default_request_timeout_secs(),
            request_log_dir: None,
            host: default_host(),
            port: default_port(),
        }
    }
}

impl AppConfig {
    /// 加载配置：文件（如果存在）+ 进程环境变量
    pub fn load() -> Self {
        let mut config = load_config_from_file().unwrap_or_default();
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config
    }

    /// 用环境变量覆盖配置
    ///
    /// `lookup` 返回变量值；空字符串视为未设置。
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(api_key) = API_KEY_VARS.iter().find_map(|key| get(*key)) {
            self.api_key = api_key;
        }
        if let Some(base_url) = get("LLM_BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(model) = get("LLM_MODEL") {
            self.model = model;
        }
        if let Some(host) = get("HOST") {
            self.host = host;
        }
        if let Some(dir) = get("LLM_REQUEST_LOG_DIR") {
            self.request_log_dir = Some(PathBuf::from(dir));
        }

        override_parsed(&get, "LLM_TEMPERATURE", &mut self.temperature);
        override_parsed(&get, "LLM_MAX_TOKENS", &mut self.max_tokens);
        override_parsed_if(&get, "LLM_TIMEOUT_SECS", &mut self.request_timeout_secs, |secs| {
            *secs > 0
        });
        override_parsed(&get, "PORT", &mut self.port);
    }

    /// 上游请求超时，0 视为未设置
    pub fn request_timeout(&self) -> Duration {
        match self.request_timeout_secs {
            0 => Duration::from_secs(default_request_timeout_secs()),
            secs => Duration::from_secs(secs),
        }
    }

    /// 监听地址字符串
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 解析失败时保留原值并告警
fn override_parsed<T, G>(get: &G, key: &str, target: &mut T)
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    override_parsed_if(get, key, target, |_| true);
}

/// 同 `override_parsed`，但值还需通过 `valid` 检查
fn override_parsed_if<T, G, V>(get: &G, key: &str, target: &mut T, valid: V)
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
    V: Fn(&T) -> bool,
{
    if let Some(raw) = get(key) {
        match raw.trim().parse::<T>() {
            Ok(value) if valid(&value) => *target = value,
            _ => warn!("Ignoring invalid {}={:?}", key, raw),
        }
    }
}

/// 全局配置单例
static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::load);

/// 从文件加载配置
fn load_config_from_file() -> Option<AppConfig> {
    let path = get_config_path();
    if !path.exists() {
        return None;
    }
    let content = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Ignoring malformed {}: {}", path.display(), e);
            None
        }
    }
}

/// 获取当前配置（克隆）
pub fn get_config() -> AppConfig {
    CONFIG.clone()
}
