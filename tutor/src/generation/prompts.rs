//! Localized prompt templates for the tutoring tasks
//!
//! Each template is a plain `format!()` string so the single user-text slot is
//! checked at compile time. Every language without its own template uses the
//! English one; callers that start from a raw code go through
//! [`Language::from_code_or_default`](crate::models::Language::from_code_or_default).

use crate::models::{Language, TaskKind};

/// Generate a prompt asking for a summary a 12-year-old can follow
///
/// # Arguments
/// * `text` - The textbook content to summarize
/// * `language` - Language the instructions (and so the answer) are written in
///
/// # Example
/// ```
/// use tutor::generation::prompts::summarize_prompt;
/// use tutor::models::Language;
///
/// let prompt = summarize_prompt("Plants turn light into sugar.", Language::En);
/// assert!(prompt.contains("Plants turn light into sugar."));
/// assert!(prompt.ends_with("Summary:"));
/// ```
pub fn summarize_prompt(text: &str, language: Language) -> String {
    match language {
        Language::En => format!(
            "You are a helpful educational assistant. Summarize the following textbook content in simple terms that a 12-year-old student can understand. Focus on the main concepts and explain them clearly:\n\n{text}\n\nSummary:"
        ),
        Language::Es => format!(
            "Eres un asistente educativo útil. Resume el siguiente contenido del libro de texto en términos simples que un estudiante de 12 años pueda entender. Enfócate en los conceptos principales y explícalos claramente:\n\n{text}\n\nResumen:"
        ),
        Language::Fr => format!(
            "Vous êtes un assistant éducatif utile. Résumez le contenu suivant du manuel en termes simples qu'un étudiant de 12 ans peut comprendre. Concentrez-vous sur les concepts principaux et expliquez-les clairement:\n\n{text}\n\nRésumé:"
        ),
        Language::De => format!(
            "Sie sind ein hilfreicher Bildungsassistent. Fassen Sie den folgenden Lehrbuchinhalt in einfachen Begriffen zusammen, die ein 12-jähriger Schüler verstehen kann. Konzentrieren Sie sich auf die Hauptkonzepte und erklären Sie sie klar:\n\n{text}\n\nZusammenfassung:"
        ),
    }
}

/// Generate a prompt asking for a student-level answer to a question
///
/// # Example
/// ```
/// use tutor::generation::prompts::answer_prompt;
/// use tutor::models::Language;
///
/// let prompt = answer_prompt("Why is the sky blue?", Language::De);
/// assert!(prompt.contains("Frage: Why is the sky blue?"));
/// ```
pub fn answer_prompt(question: &str, language: Language) -> String {
    match language {
        Language::En => format!(
            "You are a helpful educational assistant. Answer the following question in a way that a school student can understand. Provide a clear, accurate, and educational response:\n\nQuestion: {question}\n\nAnswer:"
        ),
        Language::Es => format!(
            "Eres un asistente educativo útil. Responde la siguiente pregunta de una manera que un estudiante escolar pueda entender. Proporciona una respuesta clara, precisa y educativa:\n\nPregunta: {question}\n\nRespuesta:"
        ),
        Language::Fr => format!(
            "Vous êtes un assistant éducatif utile. Répondez à la question suivante d'une manière qu'un étudiant peut comprendre. Fournissez une réponse claire, précise et éducative:\n\nQuestion: {question}\n\nRéponse:"
        ),
        Language::De => format!(
            "Sie sind ein hilfreicher Bildungsassistent. Beantworten Sie die folgende Frage so, dass ein Schüler sie verstehen kann. Geben Sie eine klare, genaue und lehrreiche Antwort:\n\nFrage: {question}\n\nAntwort:"
        ),
    }
}

/// Generate a prompt asking for a simple explanation of a concept
pub fn explain_prompt(concept: &str, language: Language) -> String {
    match language {
        Language::En => format!(
            "You are a helpful educational assistant. Explain the following concept in simple terms that a student can understand. Use examples and analogies if helpful:\n\nConcept: {concept}\n\nExplanation:"
        ),
        Language::Es => format!(
            "Eres un asistente educativo útil. Explica el siguiente concepto en términos simples que un estudiante pueda entender. Usa ejemplos y analogías si es útil:\n\nConcepto: {concept}\n\nExplicación:"
        ),
        Language::Fr => format!(
            "Vous êtes un assistant éducatif utile. Expliquez le concept suivant en termes simples qu'un étudiant peut comprendre. Utilisez des exemples et des analogies si c'est utile:\n\nConcept: {concept}\n\nExplication:"
        ),
        Language::De => format!(
            "Sie sind ein hilfreicher Bildungsassistent. Erklären Sie das folgende Konzept in einfachen Begriffen, die ein Schüler verstehen kann. Verwenden Sie Beispiele und Analogien, wenn es hilfreich ist:\n\nKonzept: {concept}\n\nErklärung:"
        ),
    }
}

/// Generate a bare translation prompt
///
/// Unlike the tutoring prompts there is no assistant framing, and the
/// instruction is always in English; only the target language name varies.
///
/// # Example
/// ```
/// use tutor::generation::prompts::translation_prompt;
/// use tutor::models::Language;
///
/// assert_eq!(
///     translation_prompt("Hello", Language::Fr),
///     "Translate the following text to French:\n\nHello\n\nTranslation:"
/// );
/// ```
pub fn translation_prompt(text: &str, target: Language) -> String {
    format!(
        "Translate the following text to {}:\n\n{text}\n\nTranslation:",
        target.name()
    )
}

/// Build the prompt for any task.
pub fn build_prompt(task: TaskKind, payload: &str, language: Language) -> String {
    match task {
        TaskKind::Summarize => summarize_prompt(payload, language),
        TaskKind::Answer => answer_prompt(payload, language),
        TaskKind::Explain => explain_prompt(payload, language),
        TaskKind::Translate => translation_prompt(payload, language),
    }
}
