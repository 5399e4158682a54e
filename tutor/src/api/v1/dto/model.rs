//! Model lifecycle and health DTOs for the v1 API.

use serde::{Deserialize, Serialize};

use crate::generation::ModelState;

/// Query parameters for `POST /v1/model:load`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct LoadModelQuery {
    /// Model to load instead of the configured one (e.g. `ollama/llama3.2:1b`).
    pub model: Option<String>,
}

/// Health data returned inside the v1 envelope.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: ModelState,
    /// `available` or `unavailable` (Tesseract missing).
    pub ocr: String,
    pub speech_enabled: bool,
}
