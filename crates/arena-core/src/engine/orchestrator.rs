use crate::errors::OrchestratorError;
use crate::model::{GenerationEvent, NewEvent, Rating};
use crate::providers::llm::BackendRegistry;
use crate::storage::Store;

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub prompt: String,
    pub backend_id: String,
    pub rating: Option<Rating>,
}

/// Runs a prompt on a backend and records the result in the event log.
#[derive(Clone)]
pub struct Orchestrator {
    pub store: Store,
    pub registry: BackendRegistry,
}

impl Orchestrator {
    pub fn new(store: Store, registry: BackendRegistry) -> Self {
        Self { store, registry }
    }

    pub async fn generate(&self, req: GenerateRequest) -> Result<GenerationEvent, OrchestratorError> {
        if req.prompt.trim().is_empty() {
            return Err(OrchestratorError::InvalidRequest(
                "prompt must not be empty".into(),
            ));
        }
        let backend = self.registry.resolve(&req.backend_id)?;

        let generation = backend
            .generate(&req.prompt)
            .await
            .map_err(|source| OrchestratorError::Generation {
                backend_id: req.backend_id.clone(),
                source,
            })?;

        let new_event = NewEvent::from_generation(&req.prompt, &req.backend_id, generation, req.rating);
        let store = self.store.clone();
        let event = tokio::task::spawn_blocking(move || store.insert_event(&new_event))
            .await
            .map_err(|e| OrchestratorError::Storage(anyhow::anyhow!("insert task failed: {e}")))?
            .map_err(OrchestratorError::Storage)?;

        tracing::info!(
            event = "generation_logged",
            event_id = event.id,
            backend = %event.backend_id,
            latency_ms = ?event.latency_ms,
            tokens = ?event.tokens,
            "generation recorded"
        );
        Ok(event)
    }

    /// Side-by-side mode: the same prompt on every listed backend, in order.
    ///
    /// `ratings` pairs up with `backend_ids` by position; extra backends get no rating.
    pub async fn compare(
        &self,
        prompt: &str,
        backend_ids: &[String],
        ratings: &[Rating],
    ) -> Result<Vec<GenerationEvent>, OrchestratorError> {
        if backend_ids.is_empty() {
            return Err(OrchestratorError::InvalidRequest(
                "compare needs at least one backend".into(),
            ));
        }
        if ratings.len() > backend_ids.len() {
            return Err(OrchestratorError::InvalidRequest(format!(
                "{} ratings given for {} backends",
                ratings.len(),
                backend_ids.len()
            )));
        }
        // Fail before generating anything if an id is unknown.
        for id in backend_ids {
            self.registry.resolve(id)?;
        }

        let mut events = Vec::with_capacity(backend_ids.len());
        for (i, backend_id) in backend_ids.iter().enumerate() {
            let ev = self
                .generate(GenerateRequest {
                    prompt: prompt.to_string(),
                    backend_id: backend_id.clone(),
                    rating: ratings.get(i).copied(),
                })
                .await?;
            events.push(ev);
        }
        Ok(events)
    }

    pub async fn rate(&self, event_id: i64, rating: Rating) -> Result<(), OrchestratorError> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.set_rating(event_id, rating))
            .await
            .map_err(|e| OrchestratorError::Storage(anyhow::anyhow!("rating task failed: {e}")))?
            .map_err(|source| OrchestratorError::Rating { event_id, source })?;
        tracing::info!(event = "rating_recorded", event_id, rating = rating.get());
        Ok(())
    }
}
