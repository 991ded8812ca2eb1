use crate::config::{ArenaConfig, BackendSpec};
use crate::errors::BackendError;
use crate::model::Generation;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

pub mod mock;
pub mod openai;

pub use mock::MockBackend;
pub use openai::OpenAiBackend;

/// A named text-generation capability.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<Generation>;
    fn backend_id(&self) -> &str;
}

/// Backends selectable by identifier.
#[derive(Clone, Default)]
pub struct BackendRegistry {
    backends: HashMap<String, Arc<dyn Backend>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(cfg: &ArenaConfig) -> Self {
        let mut registry = Self::new();
        for spec in &cfg.backends {
            let backend: Arc<dyn Backend> = match spec {
                BackendSpec::Mock { id, delay_ms } => Arc::new(MockBackend::new(
                    id.clone(),
                    std::time::Duration::from_millis(*delay_ms),
                )),
                BackendSpec::Openai(openai) => Arc::new(OpenAiBackend::from_spec(openai)),
            };
            registry.register(backend);
        }
        registry
    }

    /// Registers `backend` under its own id, replacing any previous entry.
    pub fn register(&mut self, backend: Arc<dyn Backend>) {
        self.backends
            .insert(backend.backend_id().to_string(), backend);
    }

    pub fn resolve(&self, backend_id: &str) -> Result<Arc<dyn Backend>, BackendError> {
        self.backends
            .get(backend_id)
            .cloned()
            .ok_or_else(|| BackendError::UnknownBackend(backend_id.to_string()))
    }

    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.backends.keys().cloned().collect();
        ids.sort();
        ids
    }
}
