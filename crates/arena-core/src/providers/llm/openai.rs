use super::Backend;
use crate::config::OpenAiSpec;
use crate::model::Generation;
use async_trait::async_trait;
use serde_json::json;
use std::time::Instant;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiBackend {
    pub id: String,
    pub model: String,
    pub api_key: Option<String>,
    pub api_key_env: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub cost_per_1k_tokens: Option<f64>,
    pub client: reqwest::Client,
}

impl OpenAiBackend {
    pub fn from_spec(spec: &OpenAiSpec) -> Self {
        Self {
            id: spec.id.clone(),
            model: spec.model.clone(),
            api_key: std::env::var(&spec.api_key_env)
                .ok()
                .filter(|k| !k.is_empty()),
            api_key_env: spec.api_key_env.clone(),
            base_url: spec
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            temperature: spec.temperature.unwrap_or(0.0),
            max_tokens: spec.max_tokens.unwrap_or(800),
            cost_per_1k_tokens: spec.cost_per_1k_tokens,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Backend for OpenAiBackend {
    async fn generate(&self, prompt: &str) -> anyhow::Result<Generation> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("{} is not set", self.api_key_env))?;
        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        let body = json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let started = Instant::now();
        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            anyhow::bail!("OpenAI chat API error: {}", error_text);
        }

        let json: serde_json::Value = resp.json().await?;
        let latency_ms = started.elapsed().as_secs_f64() * 1000.0;
        parse_completion(&json, latency_ms, self.cost_per_1k_tokens)
    }

    fn backend_id(&self) -> &str {
        &self.id
    }
}

fn parse_completion(
    json: &serde_json::Value,
    latency_ms: f64,
    cost_per_1k_tokens: Option<f64>,
) -> anyhow::Result<Generation> {
    let text = json
        .pointer("/choices/0/message/content")
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("OpenAI API response missing content"))?
        .to_string();

    let tokens = json.pointer("/usage/total_tokens").and_then(|v| v.as_u64());
    let cost = match (tokens, cost_per_1k_tokens) {
        (Some(t), Some(price)) => Some(t as f64 / 1000.0 * price),
        _ => None,
    };

    Ok(Generation {
        text,
        latency_ms,
        tokens,
        cost,
    })
}
