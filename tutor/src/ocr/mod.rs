//! Text extraction from textbook page images.
//!
//! The pipeline runs in three stages:
//! - `preprocessing`: decode, bound the size, grayscale, blur, Otsu-binarize
//!   and close the page so Tesseract sees clean black-on-white glyphs
//! - `provider`: a Tesseract instance (via leptess) configured with the
//!   character whitelist and page segmentation mode from `OcrConfig`
//! - `text`: whitespace cleanup, mean word confidence from the TSV output,
//!   and the non-ASCII language heuristic
//!
//! `TextExtractor` chains them. Its `extract` never fails: any error is
//! logged and an empty, zero-confidence English result is returned.
//!
//! ```rust,ignore
//! let extractor = TextExtractor::new(&config.ocr);
//! let result = extractor.extract(&image_bytes).await;
//! ```

mod extractor;
mod preprocessing;
mod provider;
mod text;

pub use extractor::TextExtractor;
pub use preprocessing::preprocess_image;
pub use provider::{OcrProvider, Recognition};
pub use text::{
    clean_text, detect_language, detect_language_detailed, mean_confidence, NON_ASCII_THRESHOLD,
};
