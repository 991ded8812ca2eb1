use crate::errors::EvalError;
use crate::model::{GenerationEvent, Rating, RawEventRow};
use crate::storage::EventSource;
use serde_json::Value;

/// In-memory snapshot of recent events, most recent first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventTable {
    rows: Vec<GenerationEvent>,
}

impl EventTable {
    /// Loads at most `limit` of the most recent events from `source`.
    pub fn load(source: &dyn EventSource, limit: usize) -> anyhow::Result<Self> {
        if limit == 0 {
            return Err(EvalError::InvalidLimit.into());
        }
        let raw = source.fetch_recent(limit)?;
        let table = Self::from_rows(raw);
        tracing::debug!(rows = table.len(), limit, "event table loaded");
        Ok(table)
    }

    /// Types raw rows, turning unusable numeric cells into missing values.
    pub fn from_rows(rows: Vec<RawEventRow>) -> Self {
        Self {
            rows: rows.into_iter().map(type_row).collect(),
        }
    }

    pub fn from_events(rows: Vec<GenerationEvent>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[GenerationEvent] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<'a> IntoIterator for &'a EventTable {
    type Item = &'a GenerationEvent;
    type IntoIter = std::slice::Iter<'a, GenerationEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

fn type_row(r: RawEventRow) -> GenerationEvent {
    let latency_ms = coerce("latency_ms", r.id, &r.latency_ms, non_negative);
    let tokens = coerce("tokens", r.id, &r.tokens, whole_count);
    let cost = coerce("cost", r.id, &r.cost, non_negative);
    let rating = coerce("rating", r.id, &r.rating, rating_value);

    GenerationEvent {
        id: r.id,
        prompt: r.prompt,
        backend_id: r.backend_id,
        output: r.output,
        latency_ms,
        tokens,
        cost,
        rating,
        created_at: r.created_at,
    }
}

/// Parses one cell; null stays missing silently, anything unusable is
/// missing with a warning.
fn coerce<T>(field: &str, id: i64, v: &Value, accept: fn(f64) -> Option<T>) -> Option<T> {
    if v.is_null() {
        return None;
    }
    let parsed = to_number(v).and_then(accept);
    if parsed.is_none() {
        tracing::warn!(event_id = id, field, value = %v, "unusable numeric value treated as missing");
    }
    parsed
}

fn to_number(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn non_negative(n: f64) -> Option<f64> {
    (n >= 0.0).then_some(n)
}

fn whole_count(n: f64) -> Option<u64> {
    (n >= 0.0 && n.fract() == 0.0 && n <= u64::MAX as f64).then_some(n as u64)
}

fn rating_value(n: f64) -> Option<Rating> {
    if n.fract() != 0.0 {
        return None;
    }
    Rating::new(n as i64).ok()
}
