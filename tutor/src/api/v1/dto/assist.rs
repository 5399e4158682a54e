//! Tutoring request DTOs for the v1 API.

use serde::Deserialize;

use crate::models::Language;

/// Request body for `POST /v1/questions:answer`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnswerQuestionRequest {
    pub question: String,
    /// ISO 639-1 code of the answer language. Unsupported codes use English.
    pub language: Option<String>,
    /// Also return the answer as base64 MP3.
    #[serde(default)]
    pub audio: bool,
}

/// Request body for `POST /v1/concepts:explain`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExplainConceptRequest {
    pub concept: String,
    pub language: Option<String>,
    #[serde(default)]
    pub audio: bool,
}

/// Request body for `POST /v1/text:summarize`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeTextRequest {
    pub text: String,
    pub language: Option<String>,
    #[serde(default)]
    pub audio: bool,
}

/// Request body for `POST /v1/text:translate`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranslateTextRequest {
    pub text: String,
    /// Target language code. Unsupported codes translate to English.
    pub target_language: String,
    #[serde(default)]
    pub audio: bool,
}

/// Multipart form accepted by `POST /v1/textbook:analyze` and `POST /v1/text:extract`.
///
/// Documentation only; handlers read the fields from the multipart stream.
#[derive(Debug, utoipa::ToSchema)]
#[allow(dead_code)]
pub struct ImageUploadForm {
    /// PNG, JPEG, BMP or TIFF image.
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    /// Summary language (analyze only).
    pub language: Option<String>,
    /// `true`/`false`; return the summary as base64 MP3 (analyze only).
    pub audio: Option<String>,
}

/// Resolve an optional language code, falling back to English.
pub fn resolve_language(code: Option<&str>) -> Language {
    code.map(Language::from_code_or_default).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_defaults_to_false() {
        let req: AnswerQuestionRequest =
            serde_json::from_str(r#"{"question": "Why is the sky blue?"}"#).unwrap();
        assert!(!req.audio);
        assert!(req.language.is_none());
    }

    #[test]
    fn test_translate_request_uses_camel_case() {
        let req: TranslateTextRequest =
            serde_json::from_str(r#"{"text": "Hola", "targetLanguage": "en"}"#).unwrap();
        assert_eq!(req.target_language, "en");
    }

    #[test]
    fn test_resolve_language() {
        assert_eq!(resolve_language(None), Language::En);
        assert_eq!(resolve_language(Some("fr")), Language::Fr);
        assert_eq!(resolve_language(Some("klingon")), Language::En);
    }
}
