use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use super::response;
use crate::generation;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tutor API",
        version = "1.0.0",
        description = "Self-hostable educational assistant. Textbook OCR plus student-level summaries, answers, explanations and translations.",
    ),
    paths(
        handlers::health::health_check,
        handlers::model::get_model,
        handlers::model::load_model,
        handlers::model::unload_model,
        handlers::model::get_settings,
        handlers::model::update_settings,
        handlers::assist::analyze_textbook,
        handlers::assist::extract_text,
        handlers::assist::answer_question,
        handlers::assist::explain_concept,
        handlers::assist::summarize_text,
        handlers::assist::translate_text,
        handlers::interactions::list_interactions,
    ),
    components(schemas(
        // Response envelope
        response::ErrorCode,
        response::ApiError,
        response::ResponseMeta,
        // Requests
        dto::AnswerQuestionRequest,
        dto::ExplainConceptRequest,
        dto::SummarizeTextRequest,
        dto::TranslateTextRequest,
        dto::ImageUploadForm,
        models::SettingsUpdate,
        // Results
        models::Language,
        models::TaskKind,
        models::Artifact,
        models::ExtractionResult,
        models::AssistResult,
        models::AnalysisResult,
        models::GenerationSettings,
        models::Interaction,
        models::InteractionKind,
        generation::ModelState,
        generation::ModelInfo,
        dto::HealthResponse,
        dto::InteractionsResponse,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "model", description = "Model lifecycle and generation settings"),
        (name = "assist", description = "Textbook analysis, answers, explanations, summaries and translations"),
        (name = "interactions", description = "In-memory interaction log"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
