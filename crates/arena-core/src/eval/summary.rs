use super::table::EventTable;
use crate::model::GenerationEvent;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Per-backend aggregate. Averages cover only rows where the field is present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendSummary {
    pub backend_id: String,
    pub run_count: usize,
    pub avg_latency_ms: Option<f64>,
    pub avg_tokens: Option<f64>,
    pub avg_cost: Option<f64>,
    pub avg_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostQualityPoint {
    pub backend_id: String,
    pub avg_cost: Option<f64>,
    pub avg_rating: Option<f64>,
}

#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    n: u64,
}

impl Mean {
    fn push(&mut self, v: Option<f64>) {
        if let Some(v) = v {
            self.sum += v;
            self.n += 1;
        }
    }

    fn value(&self) -> Option<f64> {
        (self.n > 0).then(|| self.sum / self.n as f64)
    }
}

#[derive(Debug, Default)]
struct Group {
    runs: usize,
    latency: Mean,
    tokens: Mean,
    cost: Mean,
    rating: Mean,
}

impl Group {
    fn push(&mut self, ev: &GenerationEvent) {
        self.runs += 1;
        self.latency.push(ev.latency_ms);
        self.tokens.push(ev.tokens.map(|t| t as f64));
        self.cost.push(ev.cost);
        self.rating.push(ev.rating.map(|r| f64::from(r.get())));
    }
}

/// Groups by backend in order of first appearance in the table.
fn group_by_backend(table: &EventTable) -> Vec<(&str, Group)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Group)> = Vec::new();

    for ev in table {
        let slot = *index.entry(ev.backend_id.as_str()).or_insert_with(|| {
            groups.push((ev.backend_id.as_str(), Group::default()));
            groups.len() - 1
        });
        groups[slot].1.push(ev);
    }
    groups
}

/// Per-backend statistics, best rated first.
///
/// Backends without any rating sort after every rated backend. Equal
/// averages keep first-appearance order (the sort is stable).
pub fn summarize(table: &EventTable) -> Vec<BackendSummary> {
    let mut out: Vec<BackendSummary> = group_by_backend(table)
        .into_iter()
        .map(|(backend_id, g)| BackendSummary {
            backend_id: backend_id.to_string(),
            run_count: g.runs,
            avg_latency_ms: g.latency.value(),
            avg_tokens: g.tokens.value(),
            avg_cost: g.cost.value(),
            avg_rating: g.rating.value(),
        })
        .collect();

    out.sort_by(|a, b| rating_desc(a.avg_rating, b.avg_rating));
    out
}

fn rating_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Average cost against average rating per backend, in first-appearance order.
pub fn cost_quality(table: &EventTable) -> Vec<CostQualityPoint> {
    group_by_backend(table)
        .into_iter()
        .map(|(backend_id, g)| CostQualityPoint {
            backend_id: backend_id.to_string(),
            avg_cost: g.cost.value(),
            avg_rating: g.rating.value(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rating;

    fn ev(id: i64, backend: &str, rating: Option<i64>, cost: Option<f64>) -> GenerationEvent {
        GenerationEvent {
            id,
            prompt: format!("p{id}"),
            backend_id: backend.into(),
            output: String::new(),
            latency_ms: Some(100.0 * id as f64),
            tokens: None,
            cost,
            rating: rating.map(|r| Rating::new(r).unwrap()),
            created_at: String::new(),
        }
    }

    #[test]
    fn empty_table_summarizes_to_nothing() {
        let t = EventTable::default();
        assert!(summarize(&t).is_empty());
        assert!(cost_quality(&t).is_empty());
    }

    #[test]
    fn missing_fields_are_excluded_from_averages() {
        let t = EventTable::from_events(vec![
            ev(1, "a", Some(4), Some(0.01)),
            ev(2, "a", None, None),
            ev(3, "a", Some(2), Some(0.03)),
        ]);
        let s = summarize(&t);
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].run_count, 3);
        assert_eq!(s[0].avg_rating, Some(3.0));
        assert_eq!(s[0].avg_latency_ms, Some(200.0));
        assert_eq!(s[0].avg_tokens, None);
        assert!((s[0].avg_cost.unwrap() - 0.02).abs() < 1e-12);
    }

    #[test]
    fn unrated_backends_sort_last_and_ties_keep_first_seen_order() {
        let t = EventTable::from_events(vec![
            ev(1, "unrated", None, None),
            ev(2, "b", Some(3), None),
            ev(3, "c", Some(5), None),
            ev(4, "d", Some(3), None),
        ]);
        let order: Vec<_> = summarize(&t).into_iter().map(|s| s.backend_id).collect();
        assert_eq!(order, vec!["c", "b", "d", "unrated"]);
    }

    #[test]
    fn cost_quality_keeps_grouping_order() {
        let t = EventTable::from_events(vec![
            ev(1, "z", Some(1), Some(0.5)),
            ev(2, "a", None, None),
        ]);
        let pts = cost_quality(&t);
        assert_eq!(pts[0].backend_id, "z");
        assert_eq!(pts[0].avg_cost, Some(0.5));
        assert_eq!(pts[1].avg_rating, None);
    }
}
