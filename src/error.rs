//! 统一错误处理模块
//!
//! 定义应用级错误类型，并实现 axum 的 IntoResponse trait 以便自动转换为 HTTP 响应。

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// 应用错误枚举
#[derive(Error, Debug)]
pub enum AppError {
    /// 请求参数错误
    #[error("{0}")]
    BadRequest(String),

    /// 上游模型调用失败，details 为底层错误信息
    #[error("{message}")]
    Upstream {
        message: String,
        details: Option<String>,
    },
}

impl AppError {
    /// 带诊断信息的上游错误
    pub fn upstream(message: impl Into<String>, details: impl ToString) -> Self {
        AppError::Upstream {
            message: message.into(),
            details: Some(details.to_string()),
        }
    }

    /// 不附带诊断信息的上游错误
    pub fn upstream_bare(message: impl Into<String>) -> Self {
        AppError::Upstream {
            message: message.into(),
            details: None,
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message, details) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::Upstream { message, details } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message, details)
            }
        };

        let mut body = Map::new();
        body.insert("error".to_string(), json!(error_message));
        if let Some(details) = details {
            body.insert("details".to_string(), json!(details));
        }

        (status, Json(Value::Object(body))).into_response()
    }
}

/// 便捷类型别名
pub type AppResult<T> = Result<T, AppError>;
