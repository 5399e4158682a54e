use std::sync::Arc;

use crate::config::Config;
use crate::error::Result;
use crate::generation::GenerationEngine;
use crate::ocr::TextExtractor;
use crate::services::AssistantService;
use crate::session::InteractionLog;
use crate::speech::SpeechClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub engine: Arc<GenerationEngine>,
    pub log: Arc<InteractionLog>,
    pub assistant: Arc<AssistantService>,
}

impl AppState {
    pub fn new(config: Config, extractor: TextExtractor) -> Result<Self> {
        let config = Arc::new(config);
        let engine = Arc::new(GenerationEngine::new(config.generation.clone()));
        let log = Arc::new(InteractionLog::with_capacity(
            config.server.max_interactions,
        ));
        let speech = SpeechClient::new(&config.speech)?;
        let assistant = Arc::new(AssistantService::new(
            engine.clone(),
            extractor,
            speech,
            log.clone(),
        ));

        Ok(Self {
            config,
            engine,
            log,
            assistant,
        })
    }
}
