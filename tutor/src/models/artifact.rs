use serde::Serialize;

use super::TaskKind;

/// A plain-text result offered for download.
#[derive(Debug, Clone, Serialize, PartialEq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub filename: String,
    pub mime_type: String,
    pub content: String,
}

impl Artifact {
    fn text(filename: String, content: impl Into<String>) -> Self {
        Self {
            filename,
            mime_type: "text/plain".to_string(),
            content: content.into(),
        }
    }

    /// Artifact for generated output. `subject` names explanations and is ignored otherwise.
    pub fn for_task(task: TaskKind, subject: &str, content: impl Into<String>) -> Self {
        Self::text(artifact_filename(task, subject), content)
    }

    /// The raw OCR text of an analyzed page.
    pub fn extracted_text(content: impl Into<String>) -> Self {
        Self::text("extracted_text.txt".to_string(), content)
    }
}

pub fn artifact_filename(task: TaskKind, subject: &str) -> String {
    match task {
        TaskKind::Summarize => "summary.txt".to_string(),
        TaskKind::Answer => "ai_answer.txt".to_string(),
        TaskKind::Explain => format!("{}_explanation.txt", slugify(subject)),
        TaskKind::Translate => "translation.txt".to_string(),
    }
}

/// Lowercase, whitespace runs become `_`, anything not filename-safe is dropped.
pub fn slugify(input: &str) -> String {
    let slug = input
        .split_whitespace()
        .map(|word| {
            word.chars()
                .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
                .flat_map(char::to_lowercase)
                .collect::<String>()
        })
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    if slug.is_empty() {
        "concept".to_string()
    } else {
        slug
    }
}
