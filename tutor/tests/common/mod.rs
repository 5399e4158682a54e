// Shared helpers for integration tests
#![allow(dead_code)]

use std::sync::Once;

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use tutor::config::{Config, GenerationConfig, OcrConfig, ServerConfig, SpeechConfig};

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Generation config pointing every model at `base_url`, with retries off.
pub fn generation_config(base_url: &str, model: &str, fallback: Option<&str>) -> GenerationConfig {
    GenerationConfig {
        model: model.to_string(),
        fallback_model: fallback.map(str::to_string),
        api_key: None,
        base_url: Some(base_url.to_string()),
        timeout_secs: 5,
        max_retries: 0,
        ..GenerationConfig::default()
    }
}

pub fn test_config(generation: GenerationConfig, speech: SpeechConfig) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
            max_upload_bytes: 1024 * 1024,
            max_interactions: 100,
        },
        ocr: OcrConfig::default(),
        generation,
        speech,
    }
}

pub fn model_body(id: &str) -> Value {
    json!({
        "id": id,
        "object": "model",
        "created": 1,
        "owned_by": "test"
    })
}

pub fn completion_body(text: &str) -> Value {
    json!({
        "id": "cmpl-test",
        "object": "text_completion",
        "created": 1,
        "model": "test",
        "choices": [{
            "text": text,
            "index": 0,
            "logprobs": null,
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30}
    })
}

/// Make `GET /models/{id}` succeed.
pub async fn mount_model(server: &MockServer, id: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/models/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(model_body(id)))
        .mount(server)
        .await;
}

/// Make `GET /models/{id}` answer 404 like an OpenAI-compatible server.
pub async fn mount_missing_model(server: &MockServer, id: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/models/{id}")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "message": format!("model '{id}' not found"),
                "type": "invalid_request_error",
                "param": null,
                "code": "model_not_found"
            }
        })))
        .mount(server)
        .await;
}

/// Answer every completion with `text`.
pub async fn mount_completion(server: &MockServer, text: &str) {
    Mock::given(method("POST"))
        .and(path("/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(text)))
        .mount(server)
        .await;
}
