//! LLM 请求日志记录器
//!
//! 记录所有 LLM API 请求到 JSONL 文件，便于调试和分析。

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::warn;
use uuid::Uuid;

use super::{mask_api_key, preview};

/// 日志文件名
const LOG_FILE_NAME: &str = "llm_requests.jsonl";

/// 默认保留的最大条目数
const DEFAULT_MAX_ENTRIES: usize = 1000;

/// 每写入多少条检查一次是否需要裁剪
const DEFAULT_CLEANUP_INTERVAL: usize = 100;

/// 请求日志条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// 请求 ID
    pub request_id: String,
    /// 时间戳
    pub timestamp: DateTime<Utc>,
    /// API 格式
    pub api_format: String,
    /// 端点 URL
    pub endpoint: String,
    /// 模型名称
    pub model: String,
    /// API 密钥（脱敏）
    pub api_key_masked: String,
    /// 提示词预览
    pub prompt_preview: String,
    /// 状态：pending, success, error
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_preview: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// 已打开的日志文件及自上次裁剪以来的写入次数
#[derive(Default)]
struct LogFile {
    file: Option<File>,
    writes_since_cleanup: usize,
}

/// 请求日志记录器
pub struct RequestLogger {
    log_path: PathBuf,
    max_entries: usize,
    cleanup_interval: usize,
    state: Mutex<LogFile>,
}

impl RequestLogger {
    /// 创建新的日志记录器，目录不存在时自动创建
    pub fn new(log_dir: &Path) -> Self {
        if let Err(e) = fs::create_dir_all(log_dir) {
            warn!("Failed to create request log dir {}: {}", log_dir.display(), e);
        }

        Self {
            log_path: log_dir.join(LOG_FILE_NAME),
            max_entries: DEFAULT_MAX_ENTRIES,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL,
            state: Mutex::new(LogFile::default()),
        }
    }

    /// 生成请求 ID
    pub fn generate_request_id() -> String {
        Uuid::new_v4().to_string()[..8].to_string()
    }

    /// 创建一条待完成的请求记录
    pub fn begin(
        &self,
        api_format: &str,
        endpoint: &str,
        model: &str,
        api_key: &str,
        prompt: &str,
    ) -> LogEntry {
        LogEntry {
            request_id: Self::generate_request_id(),
            timestamp: Utc::now(),
            api_format: api_format.to_string(),
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            api_key_masked: mask_api_key(api_key),
            prompt_preview: preview(prompt.trim(), 200),
            status: "pending".to_string(),
            duration_ms: None,
            response_length: None,
            response_preview: None,
            error_type: None,
            error_message: None,
            status_code: None,
        }
    }

    /// 记录成功
    pub fn log_success(&self, mut entry: LogEntry, start_time: Instant, response: &str) {
        entry.status = "success".to_string();
        entry.duration_ms = Some(start_time.elapsed().as_millis() as u64);
        entry.response_length = Some(response.chars().count());
        entry.response_preview = Some(preview(response, 300));
        self.write_entry(&entry);
    }

    /// 记录错误
    pub fn log_error(
        &self,
        mut entry: LogEntry,
        start_time: Instant,
        error_type: &str,
        error_message: &str,
        status_code: Option<u16>,
    ) {
        entry.status = "error".to_string();
        entry.duration_ms = Some(start_time.elapsed().as_millis() as u64);
        entry.error_type = Some(error_type.to_string());
        entry.error_message = Some(preview(error_message, 500));
        entry.status_code = status_code;
        self.write_entry(&entry);
    }

    /// 写入日志条目
    fn write_entry(&self, entry: &LogEntry) {
        let mut state = self.state.lock();

        // 懒加载文件
        if state.file.is_none() {
            match OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.log_path)
            {
                Ok(f) => state.file = Some(f),
                Err(e) => warn!("Failed to open {}: {}", self.log_path.display(), e),
            }
        }

        let Some(file) = state.file.as_mut() else {
            return;
        };
        if let Ok(json) = serde_json::to_string(entry) {
            let _ = writeln!(file, "{}", json);
            let _ = file.flush();
        }

        state.writes_since_cleanup += 1;
        if state.writes_since_cleanup >= self.cleanup_interval {
            state.writes_since_cleanup = 0;
            self.cleanup_if_needed(&mut state.file);
        }
    }

    /// 只保留最新的 max_entries 条
    fn cleanup_if_needed(&self, file_guard: &mut Option<File>) {
        let Ok(file) = File::open(&self.log_path) else {
            return;
        };
        let lines: Vec<String> = BufReader::new(file).lines().map_while(Result::ok).collect();
        if lines.len() <= self.max_entries {
            return;
        }

        let keep_lines = &lines[lines.len() - self.max_entries..];
        if let Ok(mut file) = File::create(&self.log_path) {
            for line in keep_lines {
                let _ = writeln!(file, "{}", line);
            }
        }
        // 文件被重建，下次写入时重新打开
        *file_guard = None;
    }
}
