use serde::Serialize;

use super::{Artifact, ExtractionResult, Language, TaskKind};

/// Output of one tutoring action (summary, answer, explanation, translation).
#[derive(Debug, Clone, Serialize, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssistResult {
    pub task: TaskKind,
    pub language: Language,
    /// Generated text, or the fixed message substituted for it.
    pub text: String,
    /// False when `text` is a canned message rather than model output.
    pub generated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure_reason: Option<String>,
    pub artifact: Artifact,
    /// Base64-encoded MP3 of `text`, when audio was requested and produced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Output of analyzing an uploaded textbook page.
#[derive(Debug, Clone, Serialize, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub extraction: ExtractionResult,
    pub extracted_artifact: Artifact,
    pub summary: AssistResult,
}
