use serde::Serialize;

use super::Language;

/// Text recognized from one image.
#[derive(Debug, Clone, Serialize, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub text: String,
    /// Mean per-word OCR confidence, 0-100.
    pub confidence: f32,
    pub language: Language,
}

impl ExtractionResult {
    pub fn new(text: String, confidence: f32, language: Language) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 100.0)
        } else {
            0.0
        };

        Self {
            text,
            confidence,
            language,
        }
    }

    /// The soft-failure value: no text, zero confidence, English.
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            confidence: 0.0,
            language: Language::En,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}
