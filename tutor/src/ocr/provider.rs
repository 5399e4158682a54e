use std::sync::Arc;
use std::time::Duration;

use leptess::{LepTess, Variable};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::OcrConfig;
use crate::error::{Result, TutorError};

/// Raw output of one Tesseract pass over a preprocessed image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recognition {
    pub text: String,
    /// Word-level TSV, including the per-word confidence column.
    pub tsv: String,
}

enum OcrBackend {
    Local { tesseract: Arc<Mutex<LepTess>> },
    Unavailable { reason: String },
}

pub struct OcrProvider {
    backend: OcrBackend,
    config: OcrConfig,
}

fn create_tesseract(config: &OcrConfig) -> std::result::Result<LepTess, String> {
    let mut lt = LepTess::new(None, &config.languages).map_err(|e| e.to_string())?;
    lt.set_variable(Variable::TesseditCharWhitelist, &config.char_whitelist)
        .map_err(|e| format!("Failed to set character whitelist: {e}"))?;
    lt.set_variable(
        Variable::TesseditPagesegMode,
        &config.page_seg_mode.to_string(),
    )
    .map_err(|e| format!("Failed to set page segmentation mode: {e}"))?;
    Ok(lt)
}

impl OcrProvider {
    pub fn new(config: &OcrConfig) -> Self {
        let backend = match create_tesseract(config) {
            Ok(lt) => {
                info!(
                    languages = %config.languages,
                    psm = config.page_seg_mode,
                    "Tesseract OCR initialized"
                );
                OcrBackend::Local {
                    tesseract: Arc::new(Mutex::new(lt)),
                }
            }
            Err(e) => {
                let reason = format!("Tesseract not available: {e}");
                warn!("{}", reason);
                OcrBackend::Unavailable { reason }
            }
        };

        Self {
            backend,
            config: config.clone(),
        }
    }

    pub fn unavailable(reason: &str, config: &OcrConfig) -> Self {
        Self {
            backend: OcrBackend::Unavailable {
                reason: reason.to_string(),
            },
            config: config.clone(),
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self.backend, OcrBackend::Unavailable { .. })
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    /// Recognize text in an already preprocessed image.
    pub async fn recognize(&self, image_bytes: &[u8]) -> Result<Recognition> {
        let timeout_duration = Duration::from_secs(self.config.timeout_secs);

        let result =
            tokio::time::timeout(timeout_duration, self.recognize_internal(image_bytes)).await;

        match result {
            Ok(inner_result) => inner_result,
            Err(_) => Err(TutorError::Ocr(format!(
                "OCR operation timed out after {} seconds",
                self.config.timeout_secs
            ))),
        }
    }

    async fn recognize_internal(&self, image_bytes: &[u8]) -> Result<Recognition> {
        match &self.backend {
            OcrBackend::Local { tesseract } => {
                let bytes = image_bytes.to_vec();
                let tesseract = Arc::clone(tesseract);

                tokio::task::spawn_blocking(move || {
                    let mut lt = tesseract.blocking_lock();
                    lt.set_image_from_mem(&bytes)
                        .map_err(|e| TutorError::Ocr(format!("Failed to set image: {e}")))?;
                    let text = lt
                        .get_utf8_text()
                        .map_err(|e| TutorError::Ocr(format!("Failed to extract text: {e}")))?;
                    // Reuses the recognition pass above; only the output format differs.
                    let tsv = lt.get_tsv_text(0).map_err(|e| {
                        TutorError::Ocr(format!("Failed to read word confidences: {e}"))
                    })?;
                    Ok(Recognition { text, tsv })
                })
                .await
                .map_err(|e| TutorError::Ocr(format!("OCR task panicked: {e}")))?
            }
            OcrBackend::Unavailable { reason } => Err(TutorError::OcrUnavailable(reason.clone())),
        }
    }
}

impl Clone for OcrProvider {
    fn clone(&self) -> Self {
        let backend = match &self.backend {
            OcrBackend::Local { tesseract } => OcrBackend::Local {
                tesseract: Arc::clone(tesseract),
            },
            OcrBackend::Unavailable { reason } => OcrBackend::Unavailable {
                reason: reason.clone(),
            },
        };

        Self {
            backend,
            config: self.config.clone(),
        }
    }
}
