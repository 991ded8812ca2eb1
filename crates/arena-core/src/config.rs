use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const SUPPORTED_CONFIG_VERSION: u32 = 1;
pub const DEFAULT_LOAD_LIMIT: usize = 500;
pub const DEFAULT_MOCK_DELAY_MS: u64 = 300;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaConfig {
    pub version: u32,
    #[serde(default = "default_db")]
    pub db: PathBuf,
    /// How many recent events the report pass reads.
    #[serde(default = "default_load_limit")]
    pub load_limit: usize,
    #[serde(default = "default_backends")]
    pub backends: Vec<BackendSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BackendSpec {
    Mock {
        id: String,
        #[serde(default = "default_mock_delay")]
        delay_ms: u64,
    },
    Openai(OpenAiSpec),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OpenAiSpec {
    pub id: String,
    pub model: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Price used to derive a cost from the reported token usage.
    #[serde(default)]
    pub cost_per_1k_tokens: Option<f64>,
}

impl BackendSpec {
    pub fn id(&self) -> &str {
        match self {
            BackendSpec::Mock { id, .. } => id,
            BackendSpec::Openai(spec) => &spec.id,
        }
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            db: default_db(),
            load_limit: default_load_limit(),
            backends: default_backends(),
        }
    }
}

fn default_db() -> PathBuf {
    PathBuf::from(".arena/arena.db")
}

fn default_load_limit() -> usize {
    DEFAULT_LOAD_LIMIT
}

fn default_mock_delay() -> u64 {
    DEFAULT_MOCK_DELAY_MS
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_backends() -> Vec<BackendSpec> {
    vec![BackendSpec::Mock {
        id: "mock".to_string(),
        delay_ms: DEFAULT_MOCK_DELAY_MS,
    }]
}

pub fn load_config(path: &Path) -> Result<ArenaConfig, ConfigError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| ConfigError(format!("failed to read config {}: {}", path.display(), e)))?;
    parse_config(&raw)
}

/// Falls back to [`ArenaConfig::default`] when `path` does not exist.
pub fn load_config_or_default(path: &Path) -> Result<ArenaConfig, ConfigError> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        Ok(ArenaConfig::default())
    }
}

pub fn parse_config(raw: &str) -> Result<ArenaConfig, ConfigError> {
    let mut ignored_keys = Vec::new();
    let deserializer = serde_yaml::Deserializer::from_str(raw);
    let cfg: ArenaConfig = serde_ignored::deserialize(deserializer, |path| {
        ignored_keys.push(path.to_string());
    })
    .map_err(|e| ConfigError(format!("failed to parse YAML: {}", e)))?;

    if !ignored_keys.is_empty() {
        tracing::warn!(keys = ?ignored_keys, "ignored unknown config fields");
    }

    if cfg.version != SUPPORTED_CONFIG_VERSION {
        return Err(ConfigError(format!(
            "unsupported config version {} (supported: {})",
            cfg.version, SUPPORTED_CONFIG_VERSION
        )));
    }
    if cfg.load_limit == 0 {
        return Err(ConfigError("load_limit must be a positive integer".into()));
    }
    if cfg.backends.is_empty() {
        return Err(ConfigError("config has no backends".into()));
    }

    let mut seen = HashSet::new();
    for b in &cfg.backends {
        if b.id().trim().is_empty() {
            return Err(ConfigError("backend id must not be empty".into()));
        }
        if !seen.insert(b.id()) {
            return Err(ConfigError(format!("duplicate backend id '{}'", b.id())));
        }
    }

    Ok(cfg)
}

pub fn write_sample_config(path: &Path) -> Result<(), ConfigError> {
    std::fs::write(path, SAMPLE_CONFIG)
        .map_err(|e| ConfigError(format!("failed to write sample config: {}", e)))?;
    Ok(())
}

pub const SAMPLE_CONFIG: &str = r#"version: 1
db: ".arena/arena.db"
load_limit: 500
backends:
  - kind: mock
    id: "mock"
    delay_ms: 300
  # - kind: openai
  #   id: "gpt-4o-mini"
  #   model: "gpt-4o-mini"
  #   api_key_env: "OPENAI_API_KEY"
  #   cost_per_1k_tokens: 0.0006
"#;
