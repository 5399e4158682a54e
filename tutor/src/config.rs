use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_opt<T: std::str::FromStr>(var: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Ignoring.", val, var, e);
                None
            }
        },
        Err(_) => None,
    }
}

pub const DEFAULT_GENERATION_MODEL: &str = "ollama/gemma2:9b-instruct";
pub const DEFAULT_FALLBACK_MODEL: &str = "ollama/llama3.2:1b";

/// Characters Tesseract is allowed to emit: ASCII letters, digits and common punctuation.
pub const DEFAULT_CHAR_WHITELIST: &str = concat!(
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
    "abcdefghijklmnopqrstuvwxyz",
    "0123456789",
    ".,!?;:()[]{}\"'-_+=/\\|@#$%^&*~`<>"
);

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
    pub generation: GenerationConfig,
    pub speech: SpeechConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound on request bodies, which caps uploaded images.
    pub max_upload_bytes: usize,
    /// Interaction log entries kept in memory before the oldest are evicted.
    pub max_interactions: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// Tesseract language packs, `+`-separated (e.g. `eng+spa`).
    pub languages: String,
    pub char_whitelist: String,
    /// Tesseract page segmentation mode. 6 = assume a single uniform block of text.
    pub page_seg_mode: u8,
    pub timeout_secs: u64,
    pub max_image_dimension: u32,
    pub min_image_dimension: u32,
    pub blur_sigma: f32,
    /// Radius of the closing structuring element; 0 skips the closing step.
    pub closing_radius: u8,
}

/// Generation engine configuration.
///
/// `temperature`, `top_p` and `max_context_length` only seed the initial
/// [`GenerationSettings`](crate::models::GenerationSettings); they are clamped
/// on the way in like every other settings write.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    pub model: String,
    pub fallback_model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub max_context_length: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    pub enabled: bool,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            languages: "eng".to_string(),
            char_whitelist: DEFAULT_CHAR_WHITELIST.to_string(),
            page_seg_mode: 6,
            timeout_secs: 60,
            max_image_dimension: 4096,
            min_image_dimension: 16,
            blur_sigma: 1.1,
            closing_radius: 1,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_GENERATION_MODEL.to_string(),
            fallback_model: Some(DEFAULT_FALLBACK_MODEL.to_string()),
            api_key: None,
            base_url: None,
            timeout_secs: 120,
            max_retries: 2,
            temperature: 0.7,
            top_p: 0.9,
            max_context_length: 2048,
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "https://translate.google.com".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let ocr_defaults = OcrConfig::default();
        let generation_defaults = GenerationConfig::default();
        let speech_defaults = SpeechConfig::default();

        Self {
            server: ServerConfig {
                host: env::var("TUTOR_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("TUTOR_PORT", 3000),
                max_upload_bytes: parse_env_or("TUTOR_MAX_UPLOAD_BYTES", 10 * 1024 * 1024),
                max_interactions: parse_env_or(
                    "TUTOR_MAX_INTERACTIONS",
                    crate::session::DEFAULT_MAX_INTERACTIONS,
                ),
            },
            ocr: OcrConfig {
                languages: env::var("OCR_LANGUAGES").unwrap_or(ocr_defaults.languages),
                char_whitelist: env::var("OCR_CHAR_WHITELIST")
                    .unwrap_or(ocr_defaults.char_whitelist),
                page_seg_mode: parse_env_or("OCR_PAGE_SEG_MODE", ocr_defaults.page_seg_mode),
                timeout_secs: parse_env_or("OCR_TIMEOUT", ocr_defaults.timeout_secs),
                max_image_dimension: parse_env_or(
                    "OCR_MAX_DIMENSION",
                    ocr_defaults.max_image_dimension,
                ),
                min_image_dimension: parse_env_or(
                    "OCR_MIN_DIMENSION",
                    ocr_defaults.min_image_dimension,
                ),
                blur_sigma: parse_env_or("OCR_BLUR_SIGMA", ocr_defaults.blur_sigma),
                closing_radius: parse_env_or("OCR_CLOSING_RADIUS", ocr_defaults.closing_radius),
            },
            generation: GenerationConfig {
                model: env::var("GENERATION_MODEL").unwrap_or(generation_defaults.model),
                fallback_model: match env::var("GENERATION_FALLBACK_MODEL") {
                    // An explicitly empty value disables the fallback attempt
                    Ok(val) if val.trim().is_empty() => None,
                    Ok(val) => Some(val),
                    Err(_) => generation_defaults.fallback_model,
                },
                api_key: env::var("GENERATION_API_KEY").ok(),
                base_url: env::var("GENERATION_BASE_URL").ok(),
                timeout_secs: parse_env_or("GENERATION_TIMEOUT", generation_defaults.timeout_secs),
                max_retries: parse_env_or(
                    "GENERATION_MAX_RETRIES",
                    generation_defaults.max_retries,
                ),
                temperature: parse_env_opt("GENERATION_TEMPERATURE")
                    .unwrap_or(generation_defaults.temperature),
                top_p: parse_env_opt("GENERATION_TOP_P").unwrap_or(generation_defaults.top_p),
                max_context_length: parse_env_opt("GENERATION_MAX_CONTEXT")
                    .unwrap_or(generation_defaults.max_context_length),
            },
            speech: SpeechConfig {
                enabled: parse_env_or("SPEECH_ENABLED", speech_defaults.enabled),
                base_url: env::var("SPEECH_BASE_URL").unwrap_or(speech_defaults.base_url),
                timeout_secs: parse_env_or("SPEECH_TIMEOUT", speech_defaults.timeout_secs),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Known LLM providers that use OpenAI-compatible APIs
pub const KNOWN_LLM_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio"];

/// Parse an LLM model name into (provider, model) tuple.
pub fn parse_llm_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_LLM_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    // Default to treating the whole string as a local model
    ("local", model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_generation_config_defaults() {
        std::env::remove_var("GENERATION_MODEL");
        std::env::remove_var("GENERATION_FALLBACK_MODEL");
        std::env::remove_var("GENERATION_TEMPERATURE");

        let config = Config::default();
        assert_eq!(config.generation.model, DEFAULT_GENERATION_MODEL);
        assert_eq!(
            config.generation.fallback_model.as_deref(),
            Some(DEFAULT_FALLBACK_MODEL)
        );
        assert_eq!(config.generation.temperature, 0.7);
        assert_eq!(config.generation.top_p, 0.9);
        assert_eq!(config.generation.max_context_length, 2048);
    }

    #[test]
    #[serial]
    fn test_generation_config_from_env() {
        std::env::set_var("GENERATION_MODEL", "openai/gpt-4o-mini");
        std::env::set_var("GENERATION_TEMPERATURE", "1.3");
        std::env::set_var("GENERATION_MAX_CONTEXT", "1024");

        let config = Config::default();
        assert_eq!(config.generation.model, "openai/gpt-4o-mini");
        assert_eq!(config.generation.temperature, 1.3);
        assert_eq!(config.generation.max_context_length, 1024);

        std::env::remove_var("GENERATION_MODEL");
        std::env::remove_var("GENERATION_TEMPERATURE");
        std::env::remove_var("GENERATION_MAX_CONTEXT");
    }

    #[test]
    #[serial]
    fn test_empty_fallback_model_disables_fallback() {
        std::env::set_var("GENERATION_FALLBACK_MODEL", "  ");
        let config = Config::default();
        assert!(config.generation.fallback_model.is_none());
        std::env::remove_var("GENERATION_FALLBACK_MODEL");
    }

    #[test]
    #[serial]
    fn test_invalid_value_falls_back_to_default() {
        std::env::set_var("OCR_BLUR_SIGMA", "not-a-number");
        let config = Config::default();
        assert_eq!(config.ocr.blur_sigma, 1.1);
        std::env::remove_var("OCR_BLUR_SIGMA");
    }

    #[test]
    fn test_ocr_defaults_whitelist_is_ascii_only() {
        let ocr = OcrConfig::default();
        assert!(ocr.char_whitelist.is_ascii());
        assert!(ocr.char_whitelist.contains('A'));
        assert!(ocr.char_whitelist.contains('9'));
        assert!(ocr.char_whitelist.contains('?'));
        assert_eq!(ocr.page_seg_mode, 6);
    }

    #[test]
    #[serial]
    fn test_parse_env_or_valid_value() {
        std::env::set_var("__TEST_PARSE_PORT", "8080");
        let result: u16 = parse_env_or("__TEST_PARSE_PORT", 3000);
        assert_eq!(result, 8080);
        std::env::remove_var("__TEST_PARSE_PORT");
    }

    #[test]
    #[serial]
    fn test_max_interactions_from_env() {
        std::env::remove_var("TUTOR_MAX_INTERACTIONS");
        assert_eq!(
            Config::default().server.max_interactions,
            crate::session::DEFAULT_MAX_INTERACTIONS
        );

        std::env::set_var("TUTOR_MAX_INTERACTIONS", "25");
        assert_eq!(Config::default().server.max_interactions, 25);
        std::env::remove_var("TUTOR_MAX_INTERACTIONS");
    }

    #[test]
    fn test_parse_llm_provider_model() {
        assert_eq!(
            parse_llm_provider_model("ollama/gemma2:9b"),
            ("ollama", "gemma2:9b")
        );
        assert_eq!(
            parse_llm_provider_model("openrouter/google/gemma-2-9b-it"),
            ("openrouter", "google/gemma-2-9b-it")
        );
        assert_eq!(
            parse_llm_provider_model("google/gemma-2-9b-it"),
            ("local", "google/gemma-2-9b-it")
        );
    }
}
