//! Tutoring handlers: textbook analysis, OCR, answers, explanations,
//! summaries and translations.

use axum::extract::{Multipart, State};

use crate::api::v1::dto::{
    resolve_language, AnswerQuestionRequest, ExplainConceptRequest, ImageUploadForm,
    SummarizeTextRequest, TranslateTextRequest,
};
use crate::api::v1::response::{ApiError, ApiResponse};
use crate::api::{AppJson, AppState};
use crate::error::{Result, TutorError};
use crate::models::{AnalysisResult, AssistResult, ExtractionResult, Language};

fn parse_form_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

struct ImageUpload {
    bytes: Vec<u8>,
    file_name: Option<String>,
    language: Language,
    audio: bool,
}

async fn read_image_upload(mut multipart: Multipart) -> Result<ImageUpload> {
    let mut bytes: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;
    let mut language: Option<String> = None;
    let mut audio = false;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| TutorError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                file_name = field.file_name().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| TutorError::Validation(format!("Failed to read file: {e}")))?;
                bytes = Some(data.to_vec());
            }
            "language" => {
                language = Some(field.text().await.map_err(|e| {
                    TutorError::Validation(format!("Invalid language value: {e}"))
                })?);
            }
            "audio" => {
                let raw = field
                    .text()
                    .await
                    .map_err(|e| TutorError::Validation(format!("Invalid audio value: {e}")))?;
                audio = parse_form_bool(&raw).ok_or_else(|| {
                    TutorError::Validation(
                        "audio must be one of true/false/1/0/yes/no".to_string(),
                    )
                })?;
            }
            _ => {}
        }
    }

    let bytes = bytes
        .filter(|b| !b.is_empty())
        .ok_or_else(|| TutorError::Validation("Missing required field: file".to_string()))?;

    Ok(ImageUpload {
        bytes,
        file_name,
        language: resolve_language(language.as_deref()),
        audio,
    })
}

/// `POST /api/v1/textbook:analyze`
///
/// Extracts text from a textbook page and summarizes it for a student.
#[utoipa::path(
    post,
    path = "/api/v1/textbook:analyze",
    tag = "assist",
    operation_id = "textbook.analyze",
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Extraction and summary", body = AnalysisResult),
        (status = 400, description = "Missing file or no text found", body = ApiError),
        (status = 409, description = "Model not loaded", body = ApiError),
    )
)]
pub async fn analyze_textbook(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResponse<AnalysisResult> {
    let upload = match read_image_upload(multipart).await {
        Ok(upload) => upload,
        Err(e) => return e.into(),
    };

    match state
        .assistant
        .analyze_textbook(
            &upload.bytes,
            upload.file_name.as_deref(),
            upload.language,
            upload.audio,
        )
        .await
    {
        Ok(result) => ApiResponse::success(result),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/text:extract`
///
/// OCR only. Does not need a loaded model.
#[utoipa::path(
    post,
    path = "/api/v1/text:extract",
    tag = "assist",
    operation_id = "text.extract",
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Extracted text", body = ExtractionResult),
        (status = 400, description = "Missing or undecodable image", body = ApiError),
        (status = 501, description = "Tesseract not available", body = ApiError),
    )
)]
pub async fn extract_text(
    State(state): State<AppState>,
    multipart: Multipart,
) -> ApiResponse<ExtractionResult> {
    let upload = match read_image_upload(multipart).await {
        Ok(upload) => upload,
        Err(e) => return e.into(),
    };

    match state.assistant.extract_text(&upload.bytes).await {
        Ok(result) => ApiResponse::success(result),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/questions:answer`
#[utoipa::path(
    post,
    path = "/api/v1/questions:answer",
    tag = "assist",
    operation_id = "questions.answer",
    request_body = AnswerQuestionRequest,
    responses(
        (status = 200, description = "Answer", body = AssistResult),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 409, description = "Model not loaded", body = ApiError),
    )
)]
pub async fn answer_question(
    State(state): State<AppState>,
    AppJson(req): AppJson<AnswerQuestionRequest>,
) -> ApiResponse<AssistResult> {
    let language = resolve_language(req.language.as_deref());

    match state
        .assistant
        .answer_question(&req.question, language, req.audio)
        .await
    {
        Ok(result) => ApiResponse::success(result),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/concepts:explain`
#[utoipa::path(
    post,
    path = "/api/v1/concepts:explain",
    tag = "assist",
    operation_id = "concepts.explain",
    request_body = ExplainConceptRequest,
    responses(
        (status = 200, description = "Explanation", body = AssistResult),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 409, description = "Model not loaded", body = ApiError),
    )
)]
pub async fn explain_concept(
    State(state): State<AppState>,
    AppJson(req): AppJson<ExplainConceptRequest>,
) -> ApiResponse<AssistResult> {
    let language = resolve_language(req.language.as_deref());

    match state
        .assistant
        .explain_concept(&req.concept, language, req.audio)
        .await
    {
        Ok(result) => ApiResponse::success(result),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/text:summarize`
#[utoipa::path(
    post,
    path = "/api/v1/text:summarize",
    tag = "assist",
    operation_id = "text.summarize",
    request_body = SummarizeTextRequest,
    responses(
        (status = 200, description = "Summary", body = AssistResult),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 409, description = "Model not loaded", body = ApiError),
    )
)]
pub async fn summarize_text(
    State(state): State<AppState>,
    AppJson(req): AppJson<SummarizeTextRequest>,
) -> ApiResponse<AssistResult> {
    let language = resolve_language(req.language.as_deref());

    match state
        .assistant
        .summarize_text(&req.text, language, req.audio)
        .await
    {
        Ok(result) => ApiResponse::success(result),
        Err(e) => e.into(),
    }
}

/// `POST /api/v1/text:translate`
///
/// On generation failure the source text is returned with `generated: false`.
#[utoipa::path(
    post,
    path = "/api/v1/text:translate",
    tag = "assist",
    operation_id = "text.translate",
    request_body = TranslateTextRequest,
    responses(
        (status = 200, description = "Translation", body = AssistResult),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 409, description = "Model not loaded", body = ApiError),
    )
)]
pub async fn translate_text(
    State(state): State<AppState>,
    AppJson(req): AppJson<TranslateTextRequest>,
) -> ApiResponse<AssistResult> {
    let target = Language::from_code_or_default(&req.target_language);

    match state
        .assistant
        .translate_text(&req.text, target, req.audio)
        .await
    {
        Ok(result) => ApiResponse::success(result),
        Err(e) => e.into(),
    }
}
