pub mod console;
pub mod json;

use crate::eval::{cost_quality, summarize, win_rate, BackendSummary, CostQualityPoint, EventTable};
use crate::model::now_rfc3339;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the dashboard shows, computed from one table snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub schema_version: u32,
    pub generated_at: String,
    pub total_events: usize,
    pub summaries: Vec<BackendSummary>,
    pub win_rates: BTreeMap<String, f64>,
    pub cost_quality: Vec<CostQualityPoint>,
}

impl EvaluationReport {
    pub fn build(table: &EventTable) -> Self {
        Self {
            schema_version: 1,
            generated_at: now_rfc3339(),
            total_events: table.len(),
            summaries: summarize(table),
            win_rates: win_rate(table),
            cost_quality: cost_quality(table),
        }
    }
}
