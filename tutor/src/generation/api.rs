use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    types::{CreateCompletionRequest, CreateCompletionRequestArgs, CreateCompletionResponse},
    Client,
};

use crate::{
    config::{parse_llm_provider_model, GenerationConfig},
    error::{Result, TutorError},
};

use super::provider::GenerationBackend;

/// Per-call sampling parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionParams {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
}

#[derive(Debug, Clone)]
struct ApiConfig {
    base_url: String,
    model: String,
    max_retries: u32,
}

/// Client for the legacy `/completions` endpoint of an OpenAI-compatible server.
///
/// Plain completions (not chat) keep the prompt templates intact and allow
/// the prompt to be echoed back in front of the continuation.
#[derive(Clone)]
pub struct CompletionApiClient {
    client: Client<OpenAIConfig>,
    config: ApiConfig,
    backend: GenerationBackend,
}

impl CompletionApiClient {
    pub fn new(model: &str, config: &GenerationConfig) -> Result<Self> {
        let backend = GenerationBackend::detect(model, config.base_url.as_deref());

        if let GenerationBackend::Unavailable { reason } = &backend {
            return Err(TutorError::ModelLoad(reason.clone()));
        }

        if backend.requires_api_key() && config.api_key.is_none() {
            return Err(TutorError::ModelLoad(format!(
                "API key required for provider '{backend}'"
            )));
        }

        let base_url = config
            .base_url
            .clone()
            .or_else(|| backend.default_base_url().map(str::to_string))
            .ok_or_else(|| TutorError::ModelLoad(format!("No base URL for model {model}")))?;

        let (provider, bare_model) = parse_llm_provider_model(model);
        let normalized_model = if provider.eq_ignore_ascii_case("local") {
            model.to_string()
        } else {
            bare_model.to_string()
        };

        let openai_config = OpenAIConfig::new()
            .with_api_base(base_url.clone())
            .with_api_key(config.api_key.clone().unwrap_or_default());

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| {
                TutorError::Generation(format!("Failed to create generation HTTP client: {error}"))
            })?;

        // Retries belong to `complete`; async-openai must hand back the first 429/5xx.
        let backoff = backoff::ExponentialBackoff {
            max_elapsed_time: Some(Duration::ZERO),
            ..Default::default()
        };

        let client = Client::with_config(openai_config)
            .with_http_client(http_client)
            .with_backoff(backoff);

        Ok(Self {
            client,
            config: ApiConfig {
                base_url,
                model: normalized_model,
                max_retries: config.max_retries,
            },
            backend,
        })
    }

    pub fn backend(&self) -> &GenerationBackend {
        &self.backend
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Model id as sent on the wire, without the provider prefix.
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Check that the server knows the model.
    pub async fn probe(&self) -> Result<()> {
        self.client
            .models()
            .retrieve(&self.config.model)
            .await
            .map(|_| ())
            .map_err(|error| {
                TutorError::ModelLoad(format!(
                    "Model '{}' is not served at {}: {}",
                    self.config.model,
                    self.config.base_url,
                    Self::map_openai_error(error)
                ))
            })
    }

    /// Request a completion with the prompt echoed back.
    ///
    /// Returns the raw choice text; stripping the echo is up to the caller.
    pub async fn complete(&self, prompt: &str, params: &CompletionParams) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(TutorError::Validation("Prompt cannot be empty".to_string()));
        }

        let mut last_error: Option<TutorError> = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                let delay_ms = 100 * 2_u64.pow(attempt - 1);
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }

            let request = self.build_request(prompt, params)?;

            match self.client.completions().create(request).await {
                Ok(response) => return Self::extract_text(response),
                Err(error) => {
                    if let Some(rate_limit_error) = Self::rate_limit_error(&error) {
                        return Err(rate_limit_error);
                    }

                    if let Some(auth_error) = Self::auth_error(&error) {
                        return Err(auth_error);
                    }

                    let retryable = Self::is_retryable(&error);
                    let mapped_error = Self::map_openai_error(error);

                    if retryable && attempt < self.config.max_retries {
                        tracing::debug!(attempt, error = %mapped_error, "Retrying completion");
                        last_error = Some(mapped_error);
                        continue;
                    }

                    return Err(mapped_error);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            TutorError::Generation("Completion failed after retries".to_string())
        }))
    }

    fn build_request(
        &self,
        prompt: &str,
        params: &CompletionParams,
    ) -> Result<CreateCompletionRequest> {
        CreateCompletionRequestArgs::default()
            .model(self.config.model.clone())
            .prompt(prompt)
            .max_tokens(params.max_tokens)
            .temperature(params.temperature)
            .top_p(params.top_p)
            .echo(true)
            .build()
            .map_err(|error| {
                TutorError::Validation(format!("Invalid completion request: {error}"))
            })
    }

    fn extract_text(response: CreateCompletionResponse) -> Result<String> {
        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .ok_or_else(|| TutorError::Generation("Completion contained no choices".to_string()))
    }

    fn is_retryable(error: &OpenAIError) -> bool {
        match error {
            OpenAIError::ApiError(api_error) => {
                api_error.r#type.is_none() && api_error.code.is_none()
            }
            OpenAIError::Reqwest(reqwest_error) => reqwest_error
                .status()
                .map(|status| status.is_server_error())
                .unwrap_or(true),
            _ => false,
        }
    }

    fn rate_limit_error(error: &OpenAIError) -> Option<TutorError> {
        match error {
            OpenAIError::Reqwest(reqwest_error)
                if reqwest_error.status() == Some(reqwest::StatusCode::TOO_MANY_REQUESTS) =>
            {
                Some(TutorError::GenerationRateLimit { retry_after: None })
            }
            OpenAIError::ApiError(api_error) if Self::is_rate_limit_api_error(api_error) => {
                Some(TutorError::GenerationRateLimit { retry_after: None })
            }
            _ => None,
        }
    }

    fn auth_error(error: &OpenAIError) -> Option<TutorError> {
        match error {
            OpenAIError::Reqwest(reqwest_error)
                if reqwest_error.status() == Some(reqwest::StatusCode::UNAUTHORIZED)
                    || reqwest_error.status() == Some(reqwest::StatusCode::FORBIDDEN) =>
            {
                Some(TutorError::Generation(format!(
                    "Generation authentication failed: {reqwest_error}"
                )))
            }
            OpenAIError::ApiError(api_error) if Self::is_auth_api_error(api_error) => Some(
                TutorError::Generation(format!("Generation authentication failed: {api_error}")),
            ),
            _ => None,
        }
    }

    fn is_rate_limit_api_error(api_error: &ApiError) -> bool {
        let message = api_error.message.to_lowercase();
        let error_type = api_error.r#type.clone().unwrap_or_default().to_lowercase();
        let code = api_error.code.clone().unwrap_or_default().to_lowercase();

        message.contains("rate limit")
            || message.contains("too many requests")
            || error_type.contains("rate_limit")
            || code.contains("rate_limit")
            || code == "insufficient_quota"
    }

    fn is_auth_api_error(api_error: &ApiError) -> bool {
        let message = api_error.message.to_lowercase();
        let error_type = api_error.r#type.clone().unwrap_or_default().to_lowercase();
        let code = api_error.code.clone().unwrap_or_default().to_lowercase();

        message.contains("unauthorized")
            || message.contains("forbidden")
            || message.contains("authentication")
            || message.contains("invalid api key")
            || code.contains("invalid_api_key")
            || code.contains("authentication")
            || error_type.contains("authentication")
    }

    fn map_openai_error(error: OpenAIError) -> TutorError {
        match error {
            OpenAIError::Reqwest(reqwest_error) => {
                TutorError::Generation(format!("Completion request failed: {reqwest_error}"))
            }
            OpenAIError::ApiError(api_error) => {
                TutorError::Generation(format!("Completion API error: {api_error}"))
            }
            OpenAIError::JSONDeserialize(err) => {
                TutorError::Generation(format!("Failed to parse completion response: {err}"))
            }
            OpenAIError::InvalidArgument(message) => TutorError::Validation(message),
            other => TutorError::Generation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> GenerationConfig {
        GenerationConfig {
            max_retries: 0,
            timeout_secs: 5,
            ..GenerationConfig::default()
        }
    }

    #[test]
    fn test_ollama_model_strips_provider_prefix() {
        let client = CompletionApiClient::new("ollama/gemma2:9b-instruct", &test_config())
            .expect("client should be created");

        assert_eq!(client.model(), "gemma2:9b-instruct");
        assert_eq!(client.base_url(), "http://localhost:11434/v1");
        assert_eq!(client.backend(), &GenerationBackend::Ollama);
    }

    #[test]
    fn test_local_model_keeps_full_name() {
        let config = GenerationConfig {
            base_url: Some("http://gpu-box:8000/v1".to_string()),
            ..test_config()
        };
        let client = CompletionApiClient::new("google/gemma-2-9b-it", &config).unwrap();

        assert_eq!(client.model(), "google/gemma-2-9b-it");
        assert_eq!(client.base_url(), "http://gpu-box:8000/v1");
    }

    #[test]
    fn test_openai_requires_api_key() {
        let result = CompletionApiClient::new("openai/gpt-3.5-turbo-instruct", &test_config());
        assert!(matches!(result, Err(TutorError::ModelLoad(_))));
    }

    #[test]
    fn test_unknown_provider_without_base_url_fails() {
        let result = CompletionApiClient::new("mystery-model", &test_config());
        assert!(matches!(result, Err(TutorError::ModelLoad(_))));
    }

    #[test]
    fn test_build_request_enables_echo_and_sampling() {
        let client = CompletionApiClient::new("ollama/llama3.2:1b", &test_config()).unwrap();
        let params = CompletionParams {
            max_tokens: 500,
            temperature: 0.7,
            top_p: 0.9,
        };

        let request = client.build_request("Summarize this", &params).unwrap();

        assert_eq!(request.model, "llama3.2:1b");
        assert_eq!(request.echo, Some(true));
        assert_eq!(request.max_tokens, Some(500));
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.top_p, Some(0.9));
    }

    #[tokio::test]
    async fn test_blank_prompt_is_rejected_before_request() {
        let client = CompletionApiClient::new("ollama/llama3.2:1b", &test_config()).unwrap();
        let params = CompletionParams {
            max_tokens: 10,
            temperature: 0.7,
            top_p: 0.9,
        };

        let result = client.complete("   ", &params).await;
        assert!(matches!(result, Err(TutorError::Validation(_))));
    }
}
