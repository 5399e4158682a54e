use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use unicode_segmentation::UnicodeSegmentation;

use crate::config::GenerationConfig;
use crate::error::{Result, TutorError};
use crate::models::{GenerationRequest, GenerationSettings, Language, SettingsUpdate, TaskKind};

use super::api::{CompletionApiClient, CompletionParams};
use super::prompts::build_prompt;
use super::provider::ModelHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ModelState {
    Unloaded,
    Loading,
    FallbackLoading,
    Loaded,
}

impl std::fmt::Display for ModelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unloaded => write!(f, "unloaded"),
            Self::Loading => write!(f, "loading"),
            Self::FallbackLoading => write!(f, "fallback_loading"),
            Self::Loaded => write!(f, "loaded"),
        }
    }
}

/// Snapshot of the engine for status endpoints.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub status: ModelState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend: Option<String>,
    pub is_fallback: bool,
    pub settings: GenerationSettings,
}

/// Result of a task helper.
///
/// Keeps the user-facing text apart from the reason it was substituted, so
/// callers can tell real output from a canned message.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Generated(String),
    EmptyInput(String),
    Failed { message: String, reason: String },
}

impl GenerationOutcome {
    pub fn text(&self) -> &str {
        match self {
            Self::Generated(text) | Self::EmptyInput(text) => text,
            Self::Failed { message, .. } => message,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Generated(text) | Self::EmptyInput(text) => text,
            Self::Failed { message, .. } => message,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            Self::Failed { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

struct ModelSlot {
    state: ModelState,
    handle: Option<ModelHandle>,
}

pub struct GenerationEngine {
    config: GenerationConfig,
    slot: RwLock<ModelSlot>,
    settings: RwLock<GenerationSettings>,
    // serializes load/unload so state transitions never interleave
    lifecycle: Mutex<()>,
}

impl GenerationEngine {
    pub fn new(config: GenerationConfig) -> Self {
        let settings = GenerationSettings::new(
            config.temperature,
            config.top_p,
            config.max_context_length,
        );

        Self {
            config,
            slot: RwLock::new(ModelSlot {
                state: ModelState::Unloaded,
                handle: None,
            }),
            settings: RwLock::new(settings),
            lifecycle: Mutex::new(()),
        }
    }

    pub async fn state(&self) -> ModelState {
        self.slot.read().await.state
    }

    pub async fn is_loaded(&self) -> bool {
        self.state().await == ModelState::Loaded
    }

    /// Load the configured model (or `model_override`), falling back once to
    /// the configured fallback model.
    pub async fn load(&self, model_override: Option<&str>) -> Result<ModelInfo> {
        let _guard = self.lifecycle.lock().await;

        let primary = model_override
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .unwrap_or(&self.config.model)
            .to_string();

        self.set_slot(ModelState::Loading, None).await;
        info!(model = %primary, "Loading generation model");

        let primary_error = match self.connect(&primary, false).await {
            Ok(handle) => {
                info!(model = %handle.model, backend = %handle.backend, "Generation model loaded");
                self.set_slot(ModelState::Loaded, Some(handle)).await;
                return Ok(self.model_info().await);
            }
            Err(e) => e,
        };

        warn!(model = %primary, error = %primary_error, "Primary model failed to load");

        let Some(fallback) = self
            .config
            .fallback_model
            .clone()
            .filter(|fallback| fallback != &primary)
        else {
            self.set_slot(ModelState::Unloaded, None).await;
            return Err(TutorError::ModelLoad(format!(
                "model '{primary}' failed: {primary_error}"
            )));
        };

        self.set_slot(ModelState::FallbackLoading, None).await;
        info!(model = %fallback, "Loading fallback generation model");

        match self.connect(&fallback, true).await {
            Ok(handle) => {
                info!(model = %handle.model, backend = %handle.backend, "Fallback model loaded");
                self.set_slot(ModelState::Loaded, Some(handle)).await;
                Ok(self.model_info().await)
            }
            Err(fallback_error) => {
                warn!(model = %fallback, error = %fallback_error, "Fallback model failed to load");
                self.set_slot(ModelState::Unloaded, None).await;
                Err(TutorError::ModelLoad(format!(
                    "model '{primary}' failed: {primary_error}; fallback '{fallback}' failed: {fallback_error}"
                )))
            }
        }
    }

    pub async fn unload(&self) {
        let _guard = self.lifecycle.lock().await;
        self.set_slot(ModelState::Unloaded, None).await;
        info!("Generation model unloaded");
    }

    async fn connect(&self, model: &str, is_fallback: bool) -> Result<ModelHandle> {
        let client = CompletionApiClient::new(model, &self.config)?;
        client.probe().await?;

        Ok(ModelHandle {
            model: model.to_string(),
            backend: client.backend().clone(),
            is_fallback,
            client,
        })
    }

    async fn set_slot(&self, state: ModelState, handle: Option<ModelHandle>) {
        let mut slot = self.slot.write().await;
        slot.state = state;
        slot.handle = handle;
    }

    pub async fn settings(&self) -> GenerationSettings {
        *self.settings.read().await
    }

    /// Apply a partial update; every field is clamped on the way in.
    pub async fn update_settings(&self, update: SettingsUpdate) -> GenerationSettings {
        let mut settings = self.settings.write().await;
        settings.update(update);
        debug!(
            temperature = settings.temperature(),
            top_p = settings.top_p(),
            max_context_length = settings.max_context_length(),
            "Generation settings updated"
        );
        *settings
    }

    pub async fn model_info(&self) -> ModelInfo {
        let settings = self.settings().await;
        let slot = self.slot.read().await;

        ModelInfo {
            status: slot.state,
            model: slot.handle.as_ref().map(|h| h.model.clone()),
            backend: slot.handle.as_ref().map(|h| h.backend.to_string()),
            is_fallback: slot.handle.as_ref().is_some_and(|h| h.is_fallback),
            settings,
        }
    }

    /// Build the prompt, run one completion and return only the continuation.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let handle = self
            .slot
            .read()
            .await
            .handle
            .clone()
            .ok_or(TutorError::ModelNotLoaded)?;
        let settings = self.settings().await;

        let prompt = build_prompt(request.task, &request.payload, request.language);
        let prompt = truncate_to_tokens(&prompt, settings.max_context_length());

        let params = CompletionParams {
            max_tokens: request.max_output_tokens,
            temperature: settings.temperature(),
            top_p: settings.top_p(),
        };

        debug!(
            task = %request.task,
            language = %request.language,
            model = %handle.model,
            prompt_chars = prompt.len(),
            "Requesting completion"
        );

        let raw = handle.client.complete(prompt, &params).await?;
        let continuation = strip_echo(&raw, prompt);

        if continuation.is_empty() {
            return Err(TutorError::Generation(
                "Model returned an empty completion".to_string(),
            ));
        }

        Ok(continuation.to_string())
    }

    async fn run_task(&self, task: TaskKind, payload: &str, language: Language) -> GenerationOutcome {
        if payload.trim().is_empty() {
            return GenerationOutcome::EmptyInput(task.empty_input_message().to_string());
        }

        let request = GenerationRequest::new(task, payload, language);
        match self.generate(&request).await {
            Ok(text) => GenerationOutcome::Generated(text),
            Err(e) => {
                warn!(task = %task, error = %e, "Generation failed");
                GenerationOutcome::Failed {
                    message: task.failure_message().unwrap_or(payload).to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    pub async fn summarize(&self, text: &str, language: Language) -> GenerationOutcome {
        self.run_task(TaskKind::Summarize, text, language).await
    }

    pub async fn answer(&self, question: &str, language: Language) -> GenerationOutcome {
        self.run_task(TaskKind::Answer, question, language).await
    }

    pub async fn explain(&self, concept: &str, language: Language) -> GenerationOutcome {
        self.run_task(TaskKind::Explain, concept, language).await
    }

    /// Translate `text` into `target`. On failure the source text is handed back.
    pub async fn translate(&self, text: &str, target: Language) -> GenerationOutcome {
        self.run_task(TaskKind::Translate, text, target).await
    }
}

/// Cut `prompt` after its first `max_tokens` word-like segments.
///
/// The real tokenizer lives behind the API; Unicode word boundaries are a
/// close enough stand-in for staying under the context window.
pub fn truncate_to_tokens(prompt: &str, max_tokens: u32) -> &str {
    let mut count = 0u32;

    for (start, segment) in prompt.split_word_bound_indices() {
        if segment.trim().is_empty() {
            continue;
        }
        if count == max_tokens {
            return prompt[..start].trim_end();
        }
        count += 1;
    }

    prompt
}

/// Remove the echoed prompt from the front of a completion and trim.
pub fn strip_echo<'a>(completion: &'a str, prompt: &str) -> &'a str {
    completion
        .strip_prefix(prompt)
        .or_else(|| completion.trim_start().strip_prefix(prompt.trim_start()))
        .unwrap_or(completion)
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_truncate_keeps_short_prompts() {
        let prompt = "Explain gravity.";
        assert_eq!(truncate_to_tokens(prompt, 100), prompt);
    }

    #[test]
    fn test_truncate_cuts_at_word_boundary() {
        assert_eq!(truncate_to_tokens("one two three four", 2), "one two");
        assert_eq!(truncate_to_tokens("  leading space here", 1), "  leading");
    }

    #[test]
    fn test_truncate_counts_punctuation_as_tokens() {
        assert_eq!(truncate_to_tokens("Hi, there friend", 2), "Hi,");
    }

    #[test]
    fn test_strip_echo_removes_prompt_prefix() {
        let prompt = "Question: why?\n\nAnswer:";
        let completion = "Question: why?\n\nAnswer: Because light scatters. ";
        assert_eq!(strip_echo(completion, prompt), "Because light scatters.");
    }

    #[test]
    fn test_strip_echo_without_echo_returns_trimmed_text() {
        assert_eq!(strip_echo("  Because.\n", "Question: why?"), "Because.");
    }

    #[test]
    fn test_strip_echo_tolerates_leading_whitespace() {
        assert_eq!(strip_echo("\nPrompt: continuation", "Prompt:"), "continuation");
    }

    #[test]
    fn test_outcome_text() {
        let failed = GenerationOutcome::Failed {
            message: "Unable to generate summary at this time.".to_string(),
            reason: "Model not loaded".to_string(),
        };
        assert_eq!(failed.text(), "Unable to generate summary at this time.");
        assert_eq!(failed.failure_reason(), Some("Model not loaded"));
        assert!(!failed.is_generated());

        let generated = GenerationOutcome::Generated("Plants eat light.".to_string());
        assert!(generated.is_generated());
        assert_eq!(generated.into_text(), "Plants eat light.");
    }

    #[tokio::test]
    async fn test_new_engine_is_unloaded_with_clamped_settings() {
        let engine = GenerationEngine::new(GenerationConfig {
            temperature: 5.0,
            top_p: 0.0,
            max_context_length: 10,
            ..GenerationConfig::default()
        });

        assert_eq!(engine.state().await, ModelState::Unloaded);
        let settings = engine.settings().await;
        assert_eq!(settings.temperature(), 2.0);
        assert_eq!(settings.top_p(), 0.1);
        assert_eq!(settings.max_context_length(), 100);
    }

    #[tokio::test]
    async fn test_empty_input_never_generates() {
        let engine = GenerationEngine::new(GenerationConfig::default());

        assert_eq!(
            engine.summarize("   ", Language::En).await,
            GenerationOutcome::EmptyInput("No text provided for summarization.".to_string())
        );
        assert_eq!(
            engine.answer("", Language::Es).await,
            GenerationOutcome::EmptyInput("No question provided.".to_string())
        );
        assert_eq!(
            engine.explain("\n", Language::Fr).await,
            GenerationOutcome::EmptyInput("No concept provided for explanation.".to_string())
        );
        assert_eq!(engine.translate(" ", Language::De).await.text(), "");
    }

    #[tokio::test]
    async fn test_unloaded_engine_substitutes_failure_messages() {
        let engine = GenerationEngine::new(GenerationConfig::default());

        let summary = engine.summarize("Rivers carve valleys.", Language::En).await;
        assert_eq!(summary.text(), "Unable to generate summary at this time.");
        assert!(summary.failure_reason().is_some());

        let translation = engine.translate("Hola", Language::En).await;
        assert_eq!(translation.text(), "Hola");
    }

    #[tokio::test]
    async fn test_generate_requires_loaded_model() {
        let engine = GenerationEngine::new(GenerationConfig::default());
        let request = GenerationRequest::new(TaskKind::Answer, "Why?", Language::En);

        assert!(matches!(
            engine.generate(&request).await,
            Err(TutorError::ModelNotLoaded)
        ));
    }

    #[tokio::test]
    async fn test_update_settings_clamps() {
        let engine = GenerationEngine::new(GenerationConfig::default());
        let settings = engine
            .update_settings(SettingsUpdate {
                temperature: Some(5.0),
                top_p: None,
                max_context_length: Some(50_000),
            })
            .await;

        assert_eq!(settings.temperature(), 2.0);
        assert_eq!(settings.top_p(), 0.9);
        assert_eq!(settings.max_context_length(), 4096);
        assert_eq!(engine.model_info().await.settings, settings);
    }
}
