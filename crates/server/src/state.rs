use std::sync::Arc;
use paperchute_core::{BatchOrchestrator, Config};

/// Shared application state
pub struct AppState {
    config: Config,
    orchestrator: Arc<BatchOrchestrator>,
}

impl AppState {
    pub fn new(config: Config, orchestrator: Arc<BatchOrchestrator>) -> Self {
        Self {
            config,
            orchestrator,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn orchestrator(&self) -> &BatchOrchestrator {
        self.orchestrator.as_ref()
    }
}
