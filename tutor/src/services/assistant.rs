use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::json;
use tracing::{info, warn};

use crate::error::{Result, TutorError};
use crate::generation::{GenerationEngine, GenerationOutcome};
use crate::models::{
    AnalysisResult, Artifact, AssistResult, ExtractionResult, InteractionKind, Language, TaskKind,
};
use crate::ocr::TextExtractor;
use crate::session::InteractionLog;
use crate::speech::SpeechClient;

/// Runs one user action end to end: extraction, generation, optional speech,
/// artifact naming and interaction logging.
pub struct AssistantService {
    engine: Arc<GenerationEngine>,
    extractor: TextExtractor,
    speech: SpeechClient,
    log: Arc<InteractionLog>,
}

impl AssistantService {
    pub fn new(
        engine: Arc<GenerationEngine>,
        extractor: TextExtractor,
        speech: SpeechClient,
        log: Arc<InteractionLog>,
    ) -> Self {
        Self {
            engine,
            extractor,
            speech,
            log,
        }
    }

    pub fn engine(&self) -> &GenerationEngine {
        &self.engine
    }

    pub fn log(&self) -> &InteractionLog {
        &self.log
    }

    pub fn ocr_available(&self) -> bool {
        self.extractor.is_available()
    }

    /// Extract a page and summarize it for a student.
    pub async fn analyze_textbook(
        &self,
        image: &[u8],
        file_name: Option<&str>,
        language: Language,
        audio: bool,
    ) -> Result<AnalysisResult> {
        self.ensure_loaded().await?;

        let extraction = self.extractor.extract(image).await;
        if extraction.is_empty() {
            return Err(TutorError::Validation(
                "Could not extract text from image. Please try a clearer image.".to_string(),
            ));
        }

        info!(
            words = extraction.word_count(),
            confidence = extraction.confidence,
            detected = %extraction.language,
            "Textbook page extracted"
        );

        let outcome = self.engine.summarize(&extraction.text, language).await;
        let summary = self
            .finish(TaskKind::Summarize, "", language, outcome, audio)
            .await;

        self.log.record(
            InteractionKind::TextbookAnalysis,
            json!({
                "file_name": file_name,
                "confidence": extraction.confidence,
                "language": extraction.language,
                "summary_length": summary.text.chars().count(),
            }),
        );

        Ok(AnalysisResult {
            extracted_artifact: Artifact::extracted_text(extraction.text.clone()),
            extraction,
            summary,
        })
    }

    /// OCR only; errors are surfaced rather than softened.
    pub async fn extract_text(&self, image: &[u8]) -> Result<ExtractionResult> {
        self.extractor.try_extract(image).await
    }

    pub async fn answer_question(
        &self,
        question: &str,
        language: Language,
        audio: bool,
    ) -> Result<AssistResult> {
        self.ensure_loaded().await?;

        let outcome = self.engine.answer(question, language).await;
        let result = self
            .finish(TaskKind::Answer, question, language, outcome, audio)
            .await;

        self.log.record(
            InteractionKind::TextQa,
            json!({
                "question": question,
                "answer_length": result.text.chars().count(),
                "language": language,
            }),
        );

        Ok(result)
    }

    pub async fn explain_concept(
        &self,
        concept: &str,
        language: Language,
        audio: bool,
    ) -> Result<AssistResult> {
        self.ensure_loaded().await?;

        let outcome = self.engine.explain(concept, language).await;
        let result = self
            .finish(TaskKind::Explain, concept, language, outcome, audio)
            .await;

        self.log.record(
            InteractionKind::ConceptExplanation,
            json!({
                "concept": concept,
                "explanation_length": result.text.chars().count(),
                "language": language,
            }),
        );

        Ok(result)
    }

    pub async fn summarize_text(
        &self,
        text: &str,
        language: Language,
        audio: bool,
    ) -> Result<AssistResult> {
        self.ensure_loaded().await?;

        let outcome = self.engine.summarize(text, language).await;
        let result = self
            .finish(TaskKind::Summarize, "", language, outcome, audio)
            .await;

        self.log.record(
            InteractionKind::Summarization,
            json!({
                "text_length": text.chars().count(),
                "summary_length": result.text.chars().count(),
                "language": language,
            }),
        );

        Ok(result)
    }

    pub async fn translate_text(
        &self,
        text: &str,
        target: Language,
        audio: bool,
    ) -> Result<AssistResult> {
        self.ensure_loaded().await?;

        let outcome = self.engine.translate(text, target).await;
        let result = self
            .finish(TaskKind::Translate, "", target, outcome, audio)
            .await;

        self.log.record(
            InteractionKind::Translation,
            json!({
                "text_length": text.chars().count(),
                "translated": result.generated,
                "target_language": target,
            }),
        );

        Ok(result)
    }

    async fn ensure_loaded(&self) -> Result<()> {
        if self.engine.is_loaded().await {
            Ok(())
        } else {
            Err(TutorError::ModelNotLoaded)
        }
    }

    async fn finish(
        &self,
        task: TaskKind,
        subject: &str,
        language: Language,
        outcome: GenerationOutcome,
        audio: bool,
    ) -> AssistResult {
        let generated = outcome.is_generated();
        let failure_reason = outcome.failure_reason().map(str::to_string);
        let text = outcome.into_text();

        let mut warnings = Vec::new();
        let audio = if audio && generated {
            self.speak(&text, language, &mut warnings).await
        } else {
            None
        };

        AssistResult {
            task,
            language,
            artifact: Artifact::for_task(task, subject, text.clone()),
            text,
            generated,
            failure_reason,
            audio,
            warnings,
        }
    }

    async fn speak(
        &self,
        text: &str,
        language: Language,
        warnings: &mut Vec<String>,
    ) -> Option<String> {
        match self.speech.synthesize(text, language).await {
            Ok(bytes) => Some(BASE64.encode(bytes)),
            Err(e) => {
                warn!(error = %e, "Audio generation failed");
                warnings.push(format!("Audio generation failed: {e}"));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GenerationConfig, OcrConfig, SpeechConfig};
    use crate::ocr::OcrProvider;

    fn service() -> AssistantService {
        AssistantService::new(
            Arc::new(GenerationEngine::new(GenerationConfig::default())),
            TextExtractor::with_provider(OcrProvider::unavailable(
                "no tesseract",
                &OcrConfig::default(),
            )),
            SpeechClient::new(&SpeechConfig::default()).unwrap(),
            Arc::new(InteractionLog::new()),
        )
    }

    #[tokio::test]
    async fn test_generation_actions_require_loaded_model() {
        let service = service();

        assert!(matches!(
            service.answer_question("Why?", Language::En, false).await,
            Err(TutorError::ModelNotLoaded)
        ));
        assert!(matches!(
            service.explain_concept("Gravity", Language::En, false).await,
            Err(TutorError::ModelNotLoaded)
        ));
        assert!(matches!(
            service.analyze_textbook(&[1, 2, 3], None, Language::En, false).await,
            Err(TutorError::ModelNotLoaded)
        ));
        assert!(service.log().is_empty());
    }

    #[tokio::test]
    async fn test_extract_text_surfaces_errors() {
        let service = service();
        assert!(matches!(
            service.extract_text(b"nope").await,
            Err(TutorError::ImageDecode(_))
        ));
    }

    #[tokio::test]
    async fn test_finish_builds_artifact_and_skips_audio_for_canned_text() {
        let service = service();
        let result = service
            .finish(
                TaskKind::Explain,
                "Climate Change",
                Language::En,
                GenerationOutcome::Failed {
                    message: "Unable to generate explanation at this time.".to_string(),
                    reason: "boom".to_string(),
                },
                true,
            )
            .await;

        assert!(!result.generated);
        assert_eq!(result.artifact.filename, "climate_change_explanation.txt");
        assert_eq!(result.failure_reason.as_deref(), Some("boom"));
        assert!(result.audio.is_none());
        assert!(result.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_disabled_speech_becomes_warning() {
        let service = service();
        let result = service
            .finish(
                TaskKind::Answer,
                "",
                Language::Es,
                GenerationOutcome::Generated("Porque sí.".to_string()),
                true,
            )
            .await;

        assert!(result.generated);
        assert!(result.audio.is_none());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].starts_with("Audio generation failed"));
    }
}
