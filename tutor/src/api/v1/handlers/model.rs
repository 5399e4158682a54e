//! Model lifecycle and generation settings handlers.

use axum::extract::{Query, State};

use crate::api::v1::dto::LoadModelQuery;
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::{AppJson, AppState};
use crate::generation::ModelInfo;
use crate::models::{GenerationSettings, SettingsUpdate};

/// `GET /api/v1/model`
#[utoipa::path(
    get,
    path = "/api/v1/model",
    tag = "model",
    operation_id = "model.get",
    responses(
        (status = 200, description = "Model status and settings", body = ModelInfo),
    )
)]
pub async fn get_model(State(state): State<AppState>) -> ApiResponse<ModelInfo> {
    ApiResponse::success(state.engine.model_info().await)
}

/// `POST /api/v1/model:load`
///
/// Loads the configured model, or `?model=` when given. Falls back once to
/// the configured fallback model.
#[utoipa::path(
    post,
    path = "/api/v1/model:load",
    tag = "model",
    operation_id = "model.load",
    params(LoadModelQuery),
    responses(
        (status = 200, description = "Model loaded", body = ModelInfo),
        (status = 502, description = "Neither the primary nor the fallback model could be loaded", body = ApiError),
    )
)]
pub async fn load_model(
    State(state): State<AppState>,
    Query(query): Query<LoadModelQuery>,
) -> ApiResponse<ModelInfo> {
    match state.engine.load(query.model.as_deref()).await {
        Ok(info) => ApiResponse::success(info),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/model:unload`
#[utoipa::path(
    post,
    path = "/api/v1/model:unload",
    tag = "model",
    operation_id = "model.unload",
    responses(
        (status = 200, description = "Model unloaded", body = ModelInfo),
    )
)]
pub async fn unload_model(State(state): State<AppState>) -> ApiResponse<ModelInfo> {
    state.engine.unload().await;
    ApiResponse::success(state.engine.model_info().await)
}

/// `GET /api/v1/settings`
#[utoipa::path(
    get,
    path = "/api/v1/settings",
    tag = "model",
    operation_id = "settings.get",
    responses(
        (status = 200, description = "Current generation settings", body = GenerationSettings),
    )
)]
pub async fn get_settings(State(state): State<AppState>) -> ApiResponse<GenerationSettings> {
    ApiResponse::success(state.engine.settings().await)
}

/// `PATCH /api/v1/settings`
///
/// Out-of-range values are clamped, not rejected.
#[utoipa::path(
    patch,
    path = "/api/v1/settings",
    tag = "model",
    operation_id = "settings.update",
    request_body = SettingsUpdate,
    responses(
        (status = 200, description = "Settings after clamping", body = GenerationSettings),
        (status = 400, description = "Invalid request", body = ApiError),
    )
)]
pub async fn update_settings(
    State(state): State<AppState>,
    AppJson(update): AppJson<SettingsUpdate>,
) -> ApiResponse<GenerationSettings> {
    ApiResponse::success(state.engine.update_settings(update).await)
}
