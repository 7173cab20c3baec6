//! Mitra Travel & Bhasha Assistant - Rust Backend
//!
//! 使用 axum 框架构建的网关服务：旅行预订、印度语言列表和翻译，智能部分全部转发给上游 LLM。

use anyhow::Context;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod error;
mod llm;
mod models;
mod services;
mod state;
mod utils;

use api::create_api_routes;
use config::get_config;
use llm::detect_api_format;
use services::LlmService;
use state::create_shared_state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 必须在读取配置之前加载
    let dotenv_loaded = dotenvy::dotenv().is_ok();

    // 初始化日志
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mitra_gateway=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Mitra gateway...");
    if dotenv_loaded {
        info!("Loaded environment from .env");
    }

    let config = get_config();
    let llm_service = LlmService::from_config(&config);
    info!(
        "Upstream model: {} ({:?}), configured={}",
        config.model,
        detect_api_format(&config.model),
        llm_service.is_configured()
    );

    // 创建共享状态
    let state = create_shared_state(Arc::new(llm_service));

    // 配置 CORS（允许所有来源）
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // 构建路由
    let app = Router::new()
        .merge(create_api_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
