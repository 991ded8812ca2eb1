use super::EvaluationReport;
use crate::eval::{BackendSummary, CostQualityPoint};
use crate::model::GenerationEvent;
use std::collections::BTreeMap;
use std::fmt::Write;

const BAR_WIDTH: usize = 30;

pub fn render_report(report: &EvaluationReport) -> String {
    if report.total_events == 0 {
        return "No runs logged yet.\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(out, "Evaluation over {} events\n", report.total_events);
    out.push_str(&render_summaries(&report.summaries));
    out.push('\n');
    out.push_str(&render_win_rates(&report.win_rates));
    out.push('\n');
    out.push_str(&render_cost_quality(&report.cost_quality));
    out
}

pub fn render_summaries(rows: &[BackendSummary]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<24} {:>6} {:>12} {:>10} {:>10} {:>8}",
        "backend", "runs", "latency_ms", "tokens", "cost", "rating"
    );
    for s in rows {
        let _ = writeln!(
            out,
            "{:<24} {:>6} {:>12} {:>10} {:>10} {:>8}",
            s.backend_id,
            s.run_count,
            opt(s.avg_latency_ms, 1),
            opt(s.avg_tokens, 1),
            opt(s.avg_cost, 4),
            opt(s.avg_rating, 2),
        );
    }
    out
}

pub fn render_win_rates(wins: &BTreeMap<String, f64>) -> String {
    if wins.is_empty() {
        return "Not enough rated runs to compute win rates.\n".to_string();
    }
    let mut out = String::from("Win rates\n");
    for (backend, rate) in wins {
        let filled = (rate * BAR_WIDTH as f64).round() as usize;
        let _ = writeln!(
            out,
            "{:<24} {:>6.1}% {}",
            backend,
            rate * 100.0,
            "#".repeat(filled.min(BAR_WIDTH))
        );
    }
    out
}

pub fn render_cost_quality(points: &[CostQualityPoint]) -> String {
    let mut out = String::from("Cost vs quality\n");
    for p in points {
        let _ = writeln!(
            out,
            "{:<24} cost={:<10} rating={}",
            p.backend_id,
            opt(p.avg_cost, 4),
            opt(p.avg_rating, 2)
        );
    }
    out
}

/// One generation as shown after `generate`/`compare`.
pub fn render_event(ev: &GenerationEvent) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "### {} (event #{})", ev.backend_id, ev.id);
    let _ = writeln!(out, "{}", ev.output);
    let _ = writeln!(
        out,
        "Latency: {} ms | Tokens: {} | Cost: ${}",
        opt(ev.latency_ms, 1),
        ev.tokens.map(|t| t.to_string()).unwrap_or_else(|| "-".into()),
        opt(ev.cost, 4)
    );
    if let Some(r) = ev.rating {
        let _ = writeln!(out, "Rating: {}", r);
    }
    out
}

fn opt(v: Option<f64>, precision: usize) -> String {
    v.map(|x| format!("{:.*}", precision, x))
        .unwrap_or_else(|| "-".to_string())
}
