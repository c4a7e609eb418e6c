//! Shared state for the HTTP layer.

use std::sync::Arc;

use crate::history::HistoryStore;
use crate::pipeline::Orchestrator;

/// Shared context for all routes.
#[derive(Clone)]
pub struct ApiContext {
    pub orchestrator: Arc<Orchestrator>,
}

impl ApiContext {
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator }
    }

    pub fn history(&self) -> Arc<dyn HistoryStore> {
        self.orchestrator.history().clone()
    }
}
