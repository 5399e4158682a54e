use serde::{Deserialize, Serialize};

use super::Language;

/// The kinds of generation the assistant performs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Summarize,
    Answer,
    Explain,
    Translate,
}

impl TaskKind {
    pub const ALL: [TaskKind; 4] = [
        TaskKind::Summarize,
        TaskKind::Answer,
        TaskKind::Explain,
        TaskKind::Translate,
    ];

    /// Upper bound on generated tokens for this task. Not a length guarantee.
    pub fn max_output_tokens(&self) -> u32 {
        match self {
            Self::Summarize => 500,
            Self::Answer => 800,
            Self::Explain => 600,
            Self::Translate => 400,
        }
    }

    /// Message returned instead of generating when the input is blank.
    pub fn empty_input_message(&self) -> &'static str {
        match self {
            Self::Summarize => "No text provided for summarization.",
            Self::Answer => "No question provided.",
            Self::Explain => "No concept provided for explanation.",
            Self::Translate => "",
        }
    }

    /// Apology substituted when generation fails.
    ///
    /// Translation has no apology; callers hand back the source text instead.
    pub fn failure_message(&self) -> Option<&'static str> {
        match self {
            Self::Summarize => Some("Unable to generate summary at this time."),
            Self::Answer => Some("Unable to generate answer at this time."),
            Self::Explain => Some("Unable to generate explanation at this time."),
            Self::Translate => None,
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Summarize => write!(f, "summarize"),
            Self::Answer => write!(f, "answer"),
            Self::Explain => write!(f, "explain"),
            Self::Translate => write!(f, "translate"),
        }
    }
}

/// A single generation job, built per user action and consumed once.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub task: TaskKind,
    pub payload: String,
    pub language: Language,
    pub max_output_tokens: u32,
}

impl GenerationRequest {
    pub fn new(task: TaskKind, payload: impl Into<String>, language: Language) -> Self {
        Self {
            task,
            payload: payload.into(),
            language,
            max_output_tokens: task.max_output_tokens(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_caps() {
        assert_eq!(TaskKind::Summarize.max_output_tokens(), 500);
        assert_eq!(TaskKind::Answer.max_output_tokens(), 800);
        assert_eq!(TaskKind::Explain.max_output_tokens(), 600);
        assert_eq!(TaskKind::Translate.max_output_tokens(), 400);
    }

    #[test]
    fn test_request_takes_cap_from_task() {
        let request = GenerationRequest::new(TaskKind::Explain, "gravity", Language::En);
        assert_eq!(request.max_output_tokens, 600);
        assert_eq!(request.payload, "gravity");
    }

    #[test]
    fn test_translate_has_no_failure_message() {
        assert!(TaskKind::Translate.failure_message().is_none());
        assert_eq!(TaskKind::Translate.empty_input_message(), "");
    }
}
