//! 前端页面
//!
//! 单页应用随二进制一起编译，直接由网关提供，API 使用相对路径。

use axum::{response::Html, routing::get, Router};
use std::sync::Arc;

use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// 创建前端页面路由
pub fn client_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(index))
}
