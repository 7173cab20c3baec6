//! REST API 请求/响应模型

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 预订请求
///
/// 所有字段都是必填的，但这里用 Option<Value> 接收：缺失或类型不对都由处理器返回 400，
/// 非字符串的值（例如数字）原样回显。
#[derive(Debug, Default, Deserialize)]
pub struct BookingRequest {
    pub name: Option<Value>,
    pub arrival_city: Option<Value>,
    pub arrival_time: Option<Value>,
    /// 行李重量，前端可能以字符串或数字提交
    pub luggage: Option<Value>,
}

/// 分配的助手
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssignedHelper {
    pub name: String,
    pub rating: f64,
}

/// 推荐景点
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendedPlace {
    pub place: String,
    pub tagline: String,
}

/// 预订响应
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub booking_status: &'static str,
    pub name: Value,
    pub arrival_city: Value,
    pub arrival_time: Value,
    pub luggage: i64,
    pub estimated_fare: i64,
    pub assigned_helper: AssignedHelper,
    pub recommended_places: Vec<RecommendedPlace>,
}

/// 语言条目
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LanguageEntry {
    pub code: String,
    pub name: String,
}

/// 翻译请求
#[derive(Debug, Default, Deserialize)]
pub struct TranslateRequest {
    pub text: Option<String>,
    pub language: Option<String>,
}

/// 翻译响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    pub translated_text: String,
}
