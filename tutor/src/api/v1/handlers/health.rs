use axum::extract::State;

use crate::api::state::AppState;
use crate::api::v1::dto::HealthResponse;
use crate::api::v1::response::ApiResponse;

/// `GET /api/v1/health`
#[utoipa::path(
    get,
    path = "/api/v1/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health status", body = HealthResponse),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> ApiResponse<HealthResponse> {
    let ocr = if state.assistant.ocr_available() {
        "available"
    } else {
        "unavailable"
    };

    ApiResponse::success(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.engine.state().await,
        ocr: ocr.to_string(),
        speech_enabled: state.config.speech.enabled,
    })
}
