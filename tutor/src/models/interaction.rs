use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    TextbookAnalysis,
    TextQa,
    ConceptExplanation,
    Summarization,
    Translation,
}

impl std::fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TextbookAnalysis => write!(f, "textbook_analysis"),
            Self::TextQa => write!(f, "text_qa"),
            Self::ConceptExplanation => write!(f, "concept_explanation"),
            Self::Summarization => write!(f, "summarization"),
            Self::Translation => write!(f, "translation"),
        }
    }
}

/// One entry of the in-memory usage log.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub id: String,
    #[schema(value_type = String)]
    pub timestamp: DateTime<Utc>,
    pub kind: InteractionKind,
    #[schema(value_type = Object)]
    pub details: serde_json::Value,
}
