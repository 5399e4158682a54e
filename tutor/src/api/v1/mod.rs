pub mod dto;
pub mod handlers;
pub mod openapi;
pub mod response;
pub mod router;

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::api::routes::create_router;
    use crate::api::state::AppState;
    use crate::config::{
        Config, GenerationConfig, OcrConfig, ServerConfig, SpeechConfig,
    };
    use crate::ocr::{OcrProvider, TextExtractor};

    fn test_state() -> AppState {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8000,
                max_upload_bytes: 1024 * 1024,
                max_interactions: 100,
            },
            ocr: OcrConfig::default(),
            generation: GenerationConfig::default(),
            speech: SpeechConfig::default(),
        };
        let extractor = TextExtractor::with_provider(OcrProvider::unavailable(
            "tesseract not installed",
            &config.ocr,
        ));
        AppState::new(config, extractor).expect("state")
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[tokio::test]
    async fn health_returns_envelope() {
        let app = create_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "ok");
        assert_eq!(json["data"]["model"], "unloaded");
        assert_eq!(json["data"]["ocr"], "unavailable");
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn openapi_json_is_v3() {
        let app = create_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/openapi.json")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert!(json["openapi"].as_str().expect("version").starts_with('3'));
        assert!(json["paths"].get("/api/v1/questions:answer").is_some());
    }

    #[tokio::test]
    async fn answer_without_model_is_conflict() {
        let app = create_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/questions:answer")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"question": "What is photosynthesis?"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "conflict");
    }

    #[tokio::test]
    async fn patch_settings_clamps_values() {
        let app = create_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/api/v1/settings")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"temperature": 5.0, "maxContextLength": 10}"#,
                    ))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["temperature"], 2.0);
        assert_eq!(json["data"]["maxContextLength"], 100);
    }

    #[tokio::test]
    async fn patch_settings_clamps_negative_context_length() {
        let app = create_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/api/v1/settings")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"maxContextLength": -5}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["maxContextLength"], 100);
    }

    #[tokio::test]
    async fn malformed_json_is_invalid_request() {
        let app = create_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/text:summarize")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "invalid_request");
    }

    #[tokio::test]
    async fn interactions_start_empty() {
        let app = create_router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/interactions")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["interactions"], serde_json::json!([]));
        assert_eq!(json["meta"]["total"], 0);
    }
}
