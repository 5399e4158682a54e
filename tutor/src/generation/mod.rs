mod api;
mod engine;
pub mod prompts;
mod provider;

pub use api::{CompletionApiClient, CompletionParams};
pub use engine::{
    strip_echo, truncate_to_tokens, GenerationEngine, GenerationOutcome, ModelInfo, ModelState,
};
pub use provider::{GenerationBackend, ModelHandle};
