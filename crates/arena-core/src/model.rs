use crate::errors::RatingError;
use serde::{Deserialize, Serialize};

/// RFC3339 UTC with microseconds; sorts lexicographically.
pub(crate) fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

/// Human quality score on a 1..=5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(v: i64) -> Result<Self, RatingError> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&v) {
            Ok(Self(v as u8))
        } else {
            Err(RatingError(v))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = RatingError;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        Rating::new(v)
    }
}

impl From<Rating> for u8 {
    fn from(r: Rating) -> u8 {
        r.0
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One logged generation invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationEvent {
    pub id: i64,
    pub prompt: String,
    pub backend_id: String,
    pub output: String,
    pub latency_ms: Option<f64>,
    pub tokens: Option<u64>,
    pub cost: Option<f64>,
    pub rating: Option<Rating>,
    pub created_at: String,
}

/// Insert payload for the event store; `id` and `created_at` are assigned on write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub prompt: String,
    pub backend_id: String,
    pub output: String,
    pub latency_ms: Option<f64>,
    pub tokens: Option<u64>,
    pub cost: Option<f64>,
    pub rating: Option<Rating>,
}

impl NewEvent {
    pub fn from_generation(
        prompt: &str,
        backend_id: &str,
        generation: Generation,
        rating: Option<Rating>,
    ) -> Self {
        Self {
            prompt: prompt.to_string(),
            backend_id: backend_id.to_string(),
            output: generation.text,
            latency_ms: Some(generation.latency_ms),
            tokens: generation.tokens,
            cost: generation.cost,
            rating,
        }
    }
}

/// What a backend returns for a single prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    pub text: String,
    pub latency_ms: f64,
    pub tokens: Option<u64>,
    pub cost: Option<f64>,
}

/// Untyped row as read back from the store.
///
/// The optional numeric cells are kept as raw JSON values: SQLite columns
/// accept any value, so a cell may hold text or garbage written by another
/// tool. Turning them into numbers is the loader's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEventRow {
    pub id: i64,
    pub prompt: String,
    pub backend_id: String,
    pub output: String,
    #[serde(default)]
    pub latency_ms: serde_json::Value,
    #[serde(default)]
    pub tokens: serde_json::Value,
    #[serde(default)]
    pub cost: serde_json::Value,
    #[serde(default)]
    pub rating: serde_json::Value,
    pub created_at: String,
}
