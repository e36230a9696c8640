//! Folding per-scenario results into a [`ModelSummary`].

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::ScoreConfig;
use crate::error::AggregateError;
use crate::scoring::{ScenarioResult, ScenarioScore};
use crate::summary::{CategorySummary, Grade, IntervalPct, ModelInfo, ModelSummary};

const CI_LEVEL: f64 = 0.95;

fn mean_of(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| lumen_stats::mean(values))
}

fn mean_field(scored: &[&ScenarioScore], field: impl Fn(&ScenarioScore) -> f64) -> Option<f64> {
    let values: Vec<f64> = scored.iter().map(|s| field(s)).collect();
    mean_of(&values)
}

fn pct(count: usize, of: usize) -> f64 {
    if of == 0 {
        0.0
    } else {
        count as f64 / of as f64 * 100.0
    }
}

/// Summarises every scenario result of one model.
///
/// Means over scoreable responses ignore unscoreable entries entirely; they
/// are not counted as zero. The success-weighted MAE is the exception: it
/// averages over all attempts and charges `config.penalty()` for each
/// unscoreable one.
///
/// # Errors
///
/// - [`AggregateError::EmptyResults`] if `results` is empty.
/// - [`AggregateError::ModelMismatch`] if a result belongs to another model.
/// - [`AggregateError::Config`] if `config` is invalid.
#[tracing::instrument(skip_all, fields(model = %model.id, n = results.len()))]
pub fn aggregate(
    model: &ModelInfo,
    results: &[ScenarioResult],
    config: &ScoreConfig,
) -> Result<ModelSummary, AggregateError> {
    config.validate()?;
    if results.is_empty() {
        return Err(AggregateError::EmptyResults {
            model: model.id.clone(),
        });
    }
    if let Some(other) = results
        .iter()
        .map(ScenarioResult::scenario)
        .find(|s| s.model_id != model.id)
    {
        return Err(AggregateError::ModelMismatch {
            expected: model.id.clone(),
            found: other.model_id.clone(),
            scenario: other.scenario_id.clone(),
        });
    }

    let total = results.len();
    let scored: Vec<&ScenarioScore> = results
        .iter()
        .filter_map(ScenarioResult::as_scored)
        .collect();
    let scoreable_count = scored.len();

    let mut failures = BTreeMap::new();
    for reason in results.iter().filter_map(ScenarioResult::unscoreable_reason) {
        *failures.entry(reason).or_insert(0usize) += 1;
    }
    let api_failures: usize = failures
        .iter()
        .filter(|(reason, _)| reason.is_api_failure())
        .map(|(_, n)| n)
        .sum();
    let api_success_count = total - api_failures;
    let json_valid_count = scoreable_count;
    let repaired_count = scored.iter().filter(|s| !s.repairs.is_empty()).count();

    let match_pct: Vec<f64> = scored.iter().map(|s| s.hourly_match_rate * 100.0).collect();
    let hourly_success_pct = mean_of(&match_pct);
    let hourly_success_median_pct = (!match_pct.is_empty())
        .then(|| lumen_stats::median(&lumen_stats::sorted_copy(&match_pct)));
    let hourly_success_sd_pct = (match_pct.len() >= 2).then(|| lumen_stats::sd(&match_pct));
    let hourly_success_ci =
        lumen_stats::mean_confidence_interval(&match_pct, CI_LEVEL).map(|ci| IntervalPct {
            lower: ci.lower,
            upper: ci.upper,
            level: ci.level,
        });

    let daily_errors: Vec<f64> = scored.iter().map(|s| s.daily_total_error).collect();
    let daily_mae = mean_of(&daily_errors);
    let unscoreable_count = total - scoreable_count;
    let success_weighted_mae = (daily_errors.iter().sum::<f64>()
        + config.penalty() * unscoreable_count as f64)
        / total as f64;

    let exact_24h_match_count = scored.iter().filter(|s| s.exact_24h_match).count();
    let exact_24h_match_pct =
        (scoreable_count > 0).then(|| pct(exact_24h_match_count, scoreable_count));

    let mean_hourly_mae = mean_field(&scored, |s| s.hourly_mae);
    let mean_hourly_rmse = mean_field(&scored, |s| s.hourly_rmse);
    let mean_cost_delta = mean_field(&scored, |s| s.cost_delta);
    let mean_target_error = mean_field(&scored, |s| s.target_error);
    let capacity_violations = scored.iter().map(|s| s.capacity_violations).sum();

    let grade = hourly_success_pct.map(Grade::from_pct);

    debug!(
        total,
        scoreable = scoreable_count,
        api_failures,
        success_weighted_mae,
        "aggregated"
    );

    Ok(ModelSummary {
        model_id: model.id.clone(),
        parameters: model.parameters,
        family: model.family.clone(),
        total,
        api_success_count,
        json_valid_count,
        scoreable_count,
        repaired_count,
        api_success_pct: pct(api_success_count, total),
        json_valid_pct: pct(json_valid_count, total),
        hourly_success_pct,
        hourly_success_median_pct,
        hourly_success_sd_pct,
        hourly_success_ci,
        daily_mae,
        success_weighted_mae,
        exact_24h_match_count,
        exact_24h_match_pct,
        mean_hourly_mae,
        mean_hourly_rmse,
        mean_cost_delta,
        mean_target_error,
        capacity_violations,
        grade,
        failures,
        categories: categories(results),
        scenario_match_pct: match_pct,
    })
}

fn categories(results: &[ScenarioResult]) -> BTreeMap<String, CategorySummary> {
    #[derive(Default)]
    struct Acc {
        attempted: usize,
        match_pct: Vec<f64>,
        daily_errors: Vec<f64>,
    }

    let mut by_category: BTreeMap<String, Acc> = BTreeMap::new();
    for result in results {
        let Some(category) = result.scenario().category.as_deref() else {
            continue;
        };
        let acc = by_category.entry(category.to_string()).or_default();
        acc.attempted += 1;
        if let Some(s) = result.as_scored() {
            acc.match_pct.push(s.hourly_match_rate * 100.0);
            acc.daily_errors.push(s.daily_total_error);
        }
    }

    by_category
        .into_iter()
        .map(|(name, acc)| {
            let summary = CategorySummary {
                attempted: acc.attempted,
                scoreable: acc.match_pct.len(),
                hourly_success_pct: mean_of(&acc.match_pct),
                daily_mae: mean_of(&acc.daily_errors),
            };
            (name, summary)
        })
        .collect()
}
