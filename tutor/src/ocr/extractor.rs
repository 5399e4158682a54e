use tracing::{debug, warn};

use crate::config::OcrConfig;
use crate::error::Result;
use crate::models::ExtractionResult;

use super::preprocessing::preprocess_image;
use super::provider::OcrProvider;
use super::text::{clean_text, detect_language, mean_confidence};

/// Turns raw uploaded image bytes into an [`ExtractionResult`].
#[derive(Clone)]
pub struct TextExtractor {
    provider: OcrProvider,
}

impl TextExtractor {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            provider: OcrProvider::new(config),
        }
    }

    pub fn with_provider(provider: OcrProvider) -> Self {
        Self { provider }
    }

    pub fn is_available(&self) -> bool {
        self.provider.is_available()
    }

    /// Run the full pipeline, surfacing the first error.
    pub async fn try_extract(&self, image_bytes: &[u8]) -> Result<ExtractionResult> {
        let processed = preprocess_image(image_bytes, self.provider.config())?;
        let recognition = self.provider.recognize(&processed).await?;

        let text = clean_text(&recognition.text);
        let confidence = mean_confidence(&recognition.tsv);
        let language = detect_language(&text);

        debug!(
            chars = text.len(),
            confidence,
            language = %language,
            "OCR extraction complete"
        );

        Ok(ExtractionResult::new(text, confidence, language))
    }

    /// Like [`try_extract`](Self::try_extract), but any failure yields
    /// [`ExtractionResult::empty`].
    pub async fn extract(&self, image_bytes: &[u8]) -> ExtractionResult {
        match self.try_extract(image_bytes).await {
            Ok(result) => result,
            Err(e) => {
                warn!(error = %e, "Text extraction failed");
                ExtractionResult::empty()
            }
        }
    }
}
