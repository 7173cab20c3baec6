//! 语言列表与翻译端点

use axum::{
    extract::rejection::JsonRejection,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tracing::{error, info};

use super::complete_list_reply;
use crate::error::{AppError, AppResult};
use crate::models::{LanguageEntry, TranslateRequest, TranslateResponse};
use crate::services::language_service::{languages_from_reply, normalize_translation};
use crate::services::PromptService;
use crate::state::AppState;
use crate::utils::preview;

/// 获取可选的印度语言列表
async fn list_languages(State(state): State<Arc<AppState>>) -> AppResult<Json<Vec<LanguageEntry>>> {
    let prompt = PromptService::new().build_languages_prompt();

    let reply = complete_list_reply(&state, &prompt).await.map_err(|e| {
        error!("Error fetching languages: {}", e);
        AppError::upstream_bare("Failed to load languages")
    })?;

    Ok(Json(languages_from_reply(&reply)))
}

/// 翻译文本
async fn translate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> AppResult<Json<TranslateResponse>> {
    let Json(req) = payload?;

    let (Some(text), Some(language)) = (
        req.text.filter(|s| !s.trim().is_empty()),
        req.language.filter(|s| !s.trim().is_empty()),
    ) else {
        return Err(AppError::BadRequest(
            "Both text and language are required.".to_string(),
        ));
    };

    let prompt = PromptService::new().build_translation_prompt(&text, &language);
    info!("[Translate] to {}: {}", language, preview(&text, 40));

    let reply = state.provider.complete(&prompt).await.map_err(|e| {
        error!("Error in /api/translate: {}", e);
        AppError::upstream("Translation failed.", e)
    })?;

    Ok(Json(TranslateResponse {
        translated_text: normalize_translation(&reply),
    }))
}

/// 创建语言相关路由
pub fn language_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/languages", get(list_languages))
        .route("/api/translate", post(translate))
}
