use super::Backend;
use crate::model::Generation;
use async_trait::async_trait;
use std::time::{Duration, Instant};

/// Deterministic local backend for development and tests.
///
/// Answers with the prompt reversed, estimates tokens as 1.3 per word and
/// never costs anything.
#[derive(Debug, Clone)]
pub struct MockBackend {
    id: String,
    delay: Duration,
}

impl MockBackend {
    pub fn new(id: impl Into<String>, delay: Duration) -> Self {
        Self {
            id: id.into(),
            delay,
        }
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn generate(&self, prompt: &str) -> anyhow::Result<Generation> {
        let started = Instant::now();
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let reversed: String = prompt.chars().rev().collect();
        let text = format!("[{} response] {}", self.id, reversed);
        let tokens = (prompt.split_whitespace().count() as f64 * 1.3).floor() as u64;

        Ok(Generation {
            text,
            latency_ms: started.elapsed().as_secs_f64() * 1000.0,
            tokens: Some(tokens),
            cost: Some(0.0),
        })
    }

    fn backend_id(&self) -> &str {
        &self.id
    }
}
