use serde::Serialize;

use crate::config::parse_llm_provider_model;

use super::api::CompletionApiClient;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";
const LMSTUDIO_BASE_URL: &str = "http://localhost:1234/v1";

/// Where a model string says its completions are served from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationBackend {
    OpenAI,
    OpenRouter,
    Ollama,
    LmStudio,
    OpenAICompatible { base_url: String },
    Unavailable { reason: String },
}

impl GenerationBackend {
    /// Pick the backend from the model's provider prefix. Unprefixed models
    /// need an explicit base URL.
    pub fn detect(model: &str, base_url: Option<&str>) -> Self {
        let (provider, _) = parse_llm_provider_model(model);

        match provider.to_lowercase().as_str() {
            "openai" => Self::OpenAI,
            "openrouter" => Self::OpenRouter,
            "ollama" => Self::Ollama,
            "lmstudio" => Self::LmStudio,
            _ => match base_url {
                Some(base_url) => Self::OpenAICompatible {
                    base_url: base_url.to_string(),
                },
                None => Self::Unavailable {
                    reason: format!("Unknown provider in model: {model}"),
                },
            },
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable { .. })
    }

    /// Whether requests must carry an API key.
    pub fn requires_api_key(&self) -> bool {
        matches!(self, Self::OpenAI | Self::OpenRouter)
    }

    pub fn default_base_url(&self) -> Option<&str> {
        match self {
            Self::OpenAI => Some(OPENAI_BASE_URL),
            Self::OpenRouter => Some(OPENROUTER_BASE_URL),
            Self::Ollama => Some(OLLAMA_BASE_URL),
            Self::LmStudio => Some(LMSTUDIO_BASE_URL),
            Self::OpenAICompatible { base_url } => Some(base_url),
            Self::Unavailable { .. } => None,
        }
    }
}

impl std::fmt::Display for GenerationBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OpenAI => write!(f, "openai"),
            Self::OpenRouter => write!(f, "openrouter"),
            Self::Ollama => write!(f, "ollama"),
            Self::LmStudio => write!(f, "lmstudio"),
            Self::OpenAICompatible { .. } => write!(f, "openai_compatible"),
            Self::Unavailable { .. } => write!(f, "unavailable"),
        }
    }
}

/// A model that answered the load probe and is ready to generate.
#[derive(Clone)]
pub struct ModelHandle {
    pub model: String,
    pub backend: GenerationBackend,
    pub is_fallback: bool,
    pub(crate) client: CompletionApiClient,
}

impl std::fmt::Debug for ModelHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelHandle")
            .field("model", &self.model)
            .field("backend", &self.backend)
            .field("is_fallback", &self.is_fallback)
            .finish_non_exhaustive()
    }
}
