//! Plain Markdown summary of model results.

use std::collections::BTreeMap;
use std::fmt::Write;

use lumen_analyze::{CrossModelStatistics, Outcome};
use lumen_score::ModelSummary;

/// Human-friendly parameter count: `7B`, `1.5B`, `350M`.
pub fn format_parameters(parameters: u64) -> String {
    let (value, unit) = if parameters >= 1_000_000_000 {
        (parameters as f64 / 1e9, "B")
    } else if parameters >= 1_000_000 {
        (parameters as f64 / 1e6, "M")
    } else if parameters >= 1_000 {
        (parameters as f64 / 1e3, "K")
    } else {
        return parameters.to_string();
    };
    let text = format!("{value:.1}");
    let text = text.strip_suffix(".0").unwrap_or(&text);
    format!("{text}{unit}")
}

fn opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.precision$}"))
}

/// Renders one table row per model, in summary order, followed by the
/// headline correlation.
///
/// `labels` maps model id to display name; missing ids show the id itself.
pub fn markdown_summary(
    summaries: &[ModelSummary],
    statistics: &CrossModelStatistics,
    labels: &BTreeMap<String, String>,
) -> String {
    let mut out = String::new();
    out.push_str("# Model summary\n\n");
    out.push_str(
        "| Model | Parameters | API success % | JSON valid % | Hourly success % \
         | Exact 24h % | Daily MAE | SW-MAE | Grade |\n",
    );
    out.push_str("|---|---:|---:|---:|---:|---:|---:|---:|:---:|\n");

    for s in summaries {
        let label = labels.get(&s.model_id).unwrap_or(&s.model_id);
        let grade = s.grade.map_or_else(|| "n/a".to_string(), |g| g.to_string());
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "| {} | {} | {:.1} | {:.1} | {} | {} | {} | {:.2} | {} |",
            label,
            format_parameters(s.parameters),
            s.api_success_pct,
            s.json_valid_pct,
            opt(s.hourly_success_pct, 1),
            opt(s.exact_24h_match_pct, 1),
            opt(s.daily_mae, 2),
            s.success_weighted_mae,
            grade,
        );
    }

    out.push('\n');
    match &statistics.parameters_vs_hourly_success {
        Outcome::Computed { value } => {
            let _ = writeln!(
                out,
                "Parameters vs hourly success: Pearson r = {:.3} (p = {:.4}), \
                 Spearman rho = {:.3} (p = {:.4}); {}.",
                value.pearson.coefficient,
                value.pearson.p_value,
                value.spearman.coefficient,
                value.spearman.p_value,
                value.interpretation.description,
            );
        }
        Outcome::InsufficientData { reason } => {
            let _ = writeln!(out, "Parameters vs hourly success: insufficient data ({reason}).");
        }
    }
    out
}
