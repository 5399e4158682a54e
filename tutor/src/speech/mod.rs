//! Speech synthesis through the Google Translate TTS endpoint.
//!
//! The endpoint accepts at most [`MAX_CHUNK_CHARS`] characters per request, so
//! text is split at word boundaries and the returned MP3 segments are
//! concatenated. MP3 frames are self-delimiting, so the joined bytes play back
//! as one file.

use std::time::Duration;

use reqwest::{header::USER_AGENT, Client};
use tracing::debug;
use url::Url;

use crate::config::SpeechConfig;
use crate::error::{Result, TutorError};
use crate::models::Language;

pub const MAX_CHUNK_CHARS: usize = 100;

#[derive(Clone)]
pub struct SpeechClient {
    client: Client,
    config: SpeechConfig,
}

impl SpeechClient {
    pub fn new(config: &SpeechConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TutorError::Speech(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Synthesize `text` in `language`, returning MP3 bytes.
    pub async fn synthesize(&self, text: &str, language: Language) -> Result<Vec<u8>> {
        if !self.config.enabled {
            return Err(TutorError::Speech("Speech synthesis is disabled".to_string()));
        }

        let chunks = chunk_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(TutorError::Speech("No text to synthesize".to_string()));
        }

        let mut audio = Vec::new();
        let total = chunks.len();

        for (idx, chunk) in chunks.iter().enumerate() {
            let url = self.chunk_url(chunk, language, idx, total)?;

            let response = self
                .client
                .get(url)
                .header(USER_AGENT, "Mozilla/5.0")
                .send()
                .await
                .map_err(|e| TutorError::Speech(format!("TTS request failed: {e}")))?;

            if !response.status().is_success() {
                return Err(TutorError::Speech(format!(
                    "TTS service returned status {}",
                    response.status()
                )));
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| TutorError::Speech(format!("Failed to read TTS audio: {e}")))?;
            audio.extend_from_slice(&bytes);
        }

        debug!(chunks = total, bytes = audio.len(), language = %language, "Speech synthesized");
        Ok(audio)
    }

    fn chunk_url(&self, chunk: &str, language: Language, idx: usize, total: usize) -> Result<Url> {
        let base = format!("{}/translate_tts", self.config.base_url.trim_end_matches('/'));
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();

        Url::parse_with_params(
            &base,
            &[
                ("ie", "UTF-8"),
                ("q", chunk),
                ("tl", language.code()),
                ("client", "tw-ob"),
                ("idx", idx.as_str()),
                ("total", total.as_str()),
                ("textlen", textlen.as_str()),
            ],
        )
        .map_err(|e| TutorError::Speech(format!("Invalid TTS URL: {e}")))
    }
}

/// Split text into pieces of at most `max_chars` characters, breaking on
/// whitespace. Words longer than `max_chars` are hard-split.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max_chars) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }

        let needed = if current.is_empty() { word_len } else { word_len + 1 };
        if current_len + needed > max_chars {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}
