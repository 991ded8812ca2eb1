use super::EvaluationReport;

pub fn to_json(report: &EvaluationReport) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
