//! API 路由模块

mod booking;
mod client;
mod config;
mod health;
mod languages;

pub use booking::booking_routes;
pub use client::client_routes;
pub use config::config_routes;
pub use health::health_routes;
pub use languages::language_routes;

use axum::Router;
use tracing::warn;

use crate::llm::LlmError;
use crate::state::AppState;
use std::sync::Arc;

/// 创建所有路由
pub fn create_api_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(client_routes())
        .merge(health_routes())
        .merge(config_routes())
        .merge(booking_routes())
        .merge(language_routes())
        .with_state(state)
}

/// 调用模型并取回需要解析成 JSON 数组的回复
///
/// 模型没有返回文本（空回复、被安全策略拦截）时按空字符串处理，由调用方走回退列表。
async fn complete_list_reply(state: &AppState, prompt: &str) -> Result<String, LlmError> {
    match state.provider.complete(prompt).await {
        Err(LlmError::EmptyResponse) => {
            warn!("Model returned no text, using fallback list");
            Ok(String::new())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmError, TextCompletionProvider};
    use crate::services::booking_service::HELPER_ROSTER;
    use crate::services::language_service::fallback_languages;
    use crate::state::create_shared_state;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use parking_lot::Mutex;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tower::ServiceExt;

    enum Reply {
        Text(String),
        Status(u16),
        Empty,
    }

    /// 返回固定回复的模型，记录调用次数和最后一次提示词
    struct ScriptedProvider {
        reply: Reply,
        calls: AtomicUsize,
        last_prompt: Mutex<Option<String>>,
    }

    impl ScriptedProvider {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                reply,
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            })
        }

        fn replying(reply: &str) -> Arc<Self> {
            Self::new(Reply::Text(reply.to_string()))
        }

        fn failing(status: u16) -> Arc<Self> {
            Self::new(Reply::Status(status))
        }

        /// 上游成功响应但没有任何文本
        fn silent() -> Arc<Self> {
            Self::new(Reply::Empty)
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextCompletionProvider for ScriptedProvider {
        async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock() = Some(prompt.to_string());
            match &self.reply {
                Reply::Text(text) => Ok(text.clone()),
                Reply::Status(status) => Err(LlmError::ApiError {
                    status: *status,
                    message: "upstream unavailable".to_string(),
                }),
                Reply::Empty => Err(LlmError::EmptyResponse),
            }
        }
    }

    fn app(provider: Arc<ScriptedProvider>) -> Router {
        create_api_routes(create_shared_state(provider))
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        app.oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const JAIPUR_PLACES: &str = r#"Sure! Here are some places:
```json
[
  {"place": "Amber Fort", "tagline": "Where Rajput valour meets Mughal art"},
  {"place": "Hawa Mahal", "tagline": "A honeycomb palace built for the breeze"},
  {"place": "City Palace", "tagline": "The living home of Jaipur's royals"}
]
```"#;

    #[tokio::test]
    async fn test_book_success() {
        let provider = ScriptedProvider::replying(JAIPUR_PLACES);
        let body = json!({
            "name": "Asha",
            "arrival_city": "Jaipur",
            "arrival_time": "10:00",
            "luggage": "15"
        });

        let response = send(app(provider.clone()), "POST", "/api/book", Some(body)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["booking_status"], "Confirmed");
        assert_eq!(json["name"], "Asha");
        assert_eq!(json["arrival_city"], "Jaipur");
        assert_eq!(json["arrival_time"], "10:00");
        assert_eq!(json["luggage"], 15);
        assert_eq!(json["estimated_fare"], 200);

        let helper_name = json["assigned_helper"]["name"].as_str().unwrap();
        assert!(HELPER_ROSTER.contains(&helper_name));
        let rating = json["assigned_helper"]["rating"].as_f64().unwrap();
        assert!((3.8..=5.0).contains(&rating));

        let places = json["recommended_places"].as_array().unwrap();
        assert_eq!(places.len(), 3);
        assert_eq!(places[0]["place"], "Amber Fort");

        assert_eq!(provider.calls(), 1);
        let prompt = provider.last_prompt.lock().clone().unwrap();
        assert!(prompt.contains("Jaipur"));
    }

    #[tokio::test]
    async fn test_book_non_numeric_luggage() {
        let provider = ScriptedProvider::replying(JAIPUR_PLACES);
        let body = json!({
            "name": "Asha",
            "arrival_city": "Jaipur",
            "arrival_time": "10:00",
            "luggage": "abc"
        });

        let response = send(app(provider), "POST", "/api/book", Some(body)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["luggage"], 0);
        assert_eq!(json["estimated_fare"], 50);
    }

    #[tokio::test]
    async fn test_book_numeric_luggage() {
        let provider = ScriptedProvider::replying(JAIPUR_PLACES);
        let body = json!({
            "name": "Ravi",
            "arrival_city": "Kochi",
            "arrival_time": "18:30",
            "luggage": 7
        });

        let json = json_body(send(app(provider), "POST", "/api/book", Some(body)).await).await;
        assert_eq!(json["estimated_fare"], 120);
    }

    #[tokio::test]
    async fn test_book_missing_fields() {
        let cases = [
            json!({"arrival_city": "Jaipur", "arrival_time": "10:00", "luggage": "15"}),
            json!({"name": "Asha", "arrival_time": "10:00", "luggage": "15"}),
            json!({"name": "Asha", "arrival_city": "Jaipur", "luggage": "15"}),
            json!({"name": "Asha", "arrival_city": "Jaipur", "arrival_time": "10:00"}),
            json!({"name": "", "arrival_city": "Jaipur", "arrival_time": "10:00", "luggage": "15"}),
            json!({"name": "Asha", "arrival_city": "Jaipur", "arrival_time": "10:00", "luggage": ""}),
            json!({"name": "Asha", "arrival_city": "Jaipur", "arrival_time": "10:00", "luggage": null}),
        ];

        for body in cases {
            let provider = ScriptedProvider::replying(JAIPUR_PLACES);
            let response = send(app(provider.clone()), "POST", "/api/book", Some(body)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(json_body(response).await, json!({"error": "All fields are required."}));
            assert_eq!(provider.calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_book_echoes_non_string_fields() {
        let provider = ScriptedProvider::replying(JAIPUR_PLACES);
        let body = json!({
            "name": 123,
            "arrival_city": "Jaipur",
            "arrival_time": 1030,
            "luggage": "15"
        });

        let response = send(app(provider.clone()), "POST", "/api/book", Some(body)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["name"], 123);
        assert_eq!(json["arrival_time"], 1030);
        assert_eq!(json["estimated_fare"], 200);
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_book_malformed_body() {
        let provider = ScriptedProvider::replying(JAIPUR_PLACES);
        let request = Request::builder()
            .method("POST")
            .uri("/api/book")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app(provider.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(json_body(response).await["error"].is_string());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_book_unparseable_places_fall_back() {
        let provider = ScriptedProvider::replying("Jaipur is lovely in winter.");
        let body = json!({
            "name": "Asha",
            "arrival_city": "Jaipur",
            "arrival_time": "10:00",
            "luggage": "15"
        });

        let json = json_body(send(app(provider), "POST", "/api/book", Some(body)).await).await;
        assert_eq!(
            json["recommended_places"],
            json!([{"place": "Unknown", "tagline": "Unable to fetch places."}])
        );
    }

    #[tokio::test]
    async fn test_book_upstream_failure() {
        let provider = ScriptedProvider::failing(429);
        let body = json!({
            "name": "Asha",
            "arrival_city": "Jaipur",
            "arrival_time": "10:00",
            "luggage": "15"
        });

        let response = send(app(provider), "POST", "/api/book", Some(body)).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(json["error"], "Booking failed.");
        assert!(json["details"].as_str().unwrap().contains("429"));
    }

    #[tokio::test]
    async fn test_languages_from_model() {
        let provider = ScriptedProvider::replying(
            r#"[{"code": "hi", "name": "Hindi"}, {"code": "mr", "name": "Marathi"}]"#,
        );

        let response = send(app(provider), "GET", "/api/languages", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!([{"code": "hi", "name": "Hindi"}, {"code": "mr", "name": "Marathi"}])
        );
    }

    #[tokio::test]
    async fn test_languages_non_json_reply_uses_fallback() {
        let provider = ScriptedProvider::replying("Hindi, Tamil, Telugu and many more.");

        let response = send(app(provider), "GET", "/api/languages", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!([
                {"code": "hi", "name": "Hindi"},
                {"code": "ta", "name": "Tamil"},
                {"code": "te", "name": "Telugu"},
                {"code": "bn", "name": "Bengali"},
                {"code": "ml", "name": "Malayalam"},
                {"code": "gu", "name": "Gujarati"}
            ])
        );
        assert_eq!(fallback_languages().len(), 6);
    }

    #[tokio::test]
    async fn test_book_empty_reply_uses_fallback_places() {
        let provider = ScriptedProvider::silent();
        let body = json!({
            "name": "Asha",
            "arrival_city": "Jaipur",
            "arrival_time": "10:00",
            "luggage": "15"
        });

        let response = send(app(provider.clone()), "POST", "/api/book", Some(body)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["estimated_fare"], 200);
        assert_eq!(
            json["recommended_places"],
            json!([{"place": "Unknown", "tagline": "Unable to fetch places."}])
        );
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn test_languages_empty_reply_uses_fallback() {
        let provider = ScriptedProvider::silent();

        let response = send(app(provider), "GET", "/api/languages", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json.as_array().unwrap().len(), 6);
        assert_eq!(json[0], json!({"code": "hi", "name": "Hindi"}));
    }

    #[tokio::test]
    async fn test_translate_empty_reply_is_an_error() {
        let provider = ScriptedProvider::silent();
        let body = json!({"text": "Hello", "language": "Hindi"});

        let response = send(app(provider), "POST", "/api/translate", Some(body)).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(json["error"], "Translation failed.");
        assert_eq!(json["details"], "model returned no text");
    }

    #[tokio::test]
    async fn test_languages_upstream_failure() {
        let provider = ScriptedProvider::failing(503);

        let response = send(app(provider), "GET", "/api/languages", None).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await, json!({"error": "Failed to load languages"}));
    }

    #[tokio::test]
    async fn test_translate_success() {
        let provider = ScriptedProvider::replying("\nनमस्ते\nदोस्त\n");
        let body = json!({"text": "Hello friend", "language": "Hindi"});

        let response = send(app(provider.clone()), "POST", "/api/translate", Some(body)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"translatedText": "नमस्ते दोस्त"}));

        let prompt = provider.last_prompt.lock().clone().unwrap();
        assert!(prompt.contains("into Hindi"));
        assert!(prompt.contains(r#""""Hello friend""""#));
    }

    #[tokio::test]
    async fn test_translate_missing_fields() {
        let cases = [
            json!({"language": "Hindi"}),
            json!({"text": "Hello"}),
            json!({"text": "", "language": "Hindi"}),
            json!({}),
        ];

        for body in cases {
            let provider = ScriptedProvider::replying("नमस्ते");
            let response = send(app(provider.clone()), "POST", "/api/translate", Some(body)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(
                json_body(response).await,
                json!({"error": "Both text and language are required."})
            );
            assert_eq!(provider.calls(), 0);
        }
    }

    #[tokio::test]
    async fn test_translate_upstream_unreachable() {
        let provider = ScriptedProvider::failing(502);
        let body = json!({"text": "Hello", "language": "Hindi"});

        let response = send(app(provider), "POST", "/api/translate", Some(body)).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = json_body(response).await;
        assert_eq!(json["error"], "Translation failed.");
        assert!(json.get("details").is_some());
    }

    #[tokio::test]
    async fn test_health_and_index() {
        let provider = ScriptedProvider::replying("");

        let response = send(app(provider.clone()), "GET", "/api/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");

        let response = send(app(provider.clone()), "GET", "/", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("/api/languages"));
        assert!(html.contains("Bhasha Mitra"));
        assert!(html.contains(r#"console.error("Booking error:""#));

        assert_eq!(provider.calls(), 0);
    }
}
