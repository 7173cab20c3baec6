//! 旅行预订端点

use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info};

use super::complete_list_reply;
use crate::error::{AppError, AppResult};
use crate::models::{BookingRequest, BookingResponse};
use crate::services::booking_service::{
    assign_helper, estimate_fare, parse_luggage_weight, places_from_reply, BOOKING_STATUS,
};
use crate::services::PromptService;
use crate::state::AppState;

/// 必填字段：null 和空字符串视为缺失
fn required(field: Option<Value>) -> Option<Value> {
    field.filter(|v| match v {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    })
}

/// 字段的文本形式，用于拼接提示词
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 创建预订
async fn book(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> AppResult<Json<BookingResponse>> {
    let Json(req) = payload?;

    let (Some(name), Some(arrival_city), Some(arrival_time), Some(luggage)) = (
        required(req.name),
        required(req.arrival_city),
        required(req.arrival_time),
        required(req.luggage),
    ) else {
        return Err(AppError::BadRequest("All fields are required.".to_string()));
    };

    let luggage_weight = parse_luggage_weight(&luggage);
    let estimated_fare = estimate_fare(luggage_weight);
    let assigned_helper = assign_helper(&mut rand::rng());

    let city = value_text(&arrival_city);
    let prompt = PromptService::new().build_places_prompt(&city);
    info!("Generating travel info for {}...", city);

    let reply = complete_list_reply(&state, &prompt).await.map_err(|e| {
        error!("Error in /api/book: {}", e);
        AppError::upstream("Booking failed.", e)
    })?;

    Ok(Json(BookingResponse {
        booking_status: BOOKING_STATUS,
        name,
        arrival_city,
        arrival_time,
        luggage: luggage_weight,
        estimated_fare,
        assigned_helper,
        recommended_places: places_from_reply(&reply),
    }))
}

/// 创建预订路由
pub fn booking_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/book", post(book))
}
