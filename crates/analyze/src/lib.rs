//! Cross-model statistics: how does declared model size relate to
//! allocation accuracy?
//!
//! [`analyze`] takes the per-model summaries produced by `lumen-score` and
//! returns [`CrossModelStatistics`]: descriptive statistics, Pearson and
//! Spearman correlations with a pair-bootstrap interval, linear and
//! log-linear regressions with residual normality checks, a rank test
//! between model families, and pairwise t-tests on per-scenario results.
//!
//! Anything that cannot be computed from the data at hand is reported as
//! [`Outcome::InsufficientData`] (or omitted, for the family comparison),
//! never as a zero.

mod bootstrap;
mod config;
mod correlation;
mod descriptive;
mod error;
mod groups;
mod outcome;
mod output;
mod pairwise;
mod regression;

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

use lumen_score::ModelSummary;

pub use bootstrap::{BootstrapDistribution, BootstrapSummary};
pub use config::AnalyzeConfig;
pub use correlation::{
    CorrelationReport, Direction, Interpretation, Strength, TestedCorrelation, interpret,
};
pub use descriptive::{Descriptive, DescriptiveSet};
pub use error::AnalyzeError;
pub use groups::{GroupComparison, GroupStats, GroupTestKind};
pub use outcome::Outcome;
pub use output::{AnalysisReport, CrossModelStatistics, SecondaryCorrelations, to_json};
pub use pairwise::{EffectSize, PairwiseComparison};
pub use regression::{RegressionFit, RegressionKind, RegressionReport, ResidualNormality};

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Computes every cross-model statistic over `summaries`.
///
/// Models whose hourly success percentage is `None` (nothing scoreable) are
/// left out of the paired vectors but still count towards the descriptive
/// statistics of the metrics they do have.
///
/// # Errors
///
/// - [`AnalyzeError::InvalidAlpha`] if `config` is invalid.
/// - [`AnalyzeError::InvalidParameters`] if a model declares zero
///   parameters.
/// - [`AnalyzeError::DuplicateModel`] if two summaries share a model id.
#[tracing::instrument(skip_all, fields(models = summaries.len()))]
pub fn analyze(
    summaries: &[ModelSummary],
    config: &AnalyzeConfig,
) -> Result<CrossModelStatistics, AnalyzeError> {
    config.validate()?;
    let mut seen = BTreeSet::new();
    for s in summaries {
        if s.parameters == 0 {
            return Err(AnalyzeError::InvalidParameters {
                model: s.model_id.clone(),
            });
        }
        if !seen.insert(s.model_id.as_str()) {
            return Err(AnalyzeError::DuplicateModel {
                model: s.model_id.clone(),
            });
        }
    }

    let alpha = config.alpha();
    let parameters: Vec<f64> = summaries.iter().map(|s| s.parameters as f64).collect();

    // Paired vectors over models with a defined hourly success rate.
    let paired: Vec<&ModelSummary> = summaries
        .iter()
        .filter(|s| s.hourly_success_pct.is_some())
        .collect();
    let paired_params: Vec<f64> = paired.iter().map(|s| s.parameters as f64).collect();
    let paired_success: Vec<f64> = paired
        .iter()
        .filter_map(|s| s.hourly_success_pct)
        .collect();
    debug!(paired = paired.len(), "built paired vectors");

    let mut primary = correlation::correlate(&paired_params, &paired_success, alpha);
    if let Outcome::Computed { value } = &mut primary {
        let mut rng = make_rng(config.seed());
        value.bootstrap = Some(bootstrap::bootstrap_correlation(
            &paired_params,
            &paired_success,
            config.bootstrap_iterations(),
            &mut rng,
        ));
    }

    let api: Vec<f64> = summaries.iter().map(|s| s.api_success_pct).collect();
    let json: Vec<f64> = summaries.iter().map(|s| s.json_valid_pct).collect();
    let sw_mae: Vec<f64> = summaries.iter().map(|s| s.success_weighted_mae).collect();

    let secondary_correlations = SecondaryCorrelations {
        parameters_vs_api_success_pct: correlation::correlate(&parameters, &api, alpha),
        parameters_vs_json_valid_pct: correlation::correlate(&parameters, &json, alpha),
        parameters_vs_success_weighted_mae: correlation::correlate(&parameters, &sw_mae, alpha),
    };

    let descriptive = DescriptiveSet {
        parameters: descriptive::describe(&parameters),
        hourly_success_pct: descriptive::describe(&paired_success),
        api_success_pct: descriptive::describe(&api),
        json_valid_pct: descriptive::describe(&json),
        success_weighted_mae: descriptive::describe(&sw_mae),
    };

    let regression = regression::regress(&paired_params, &paired_success);

    let family_comparison = groups::compare_groups(
        paired
            .iter()
            .filter_map(|s| Some((s.family.as_deref()?, s.hourly_success_pct?))),
        alpha,
    );

    let pairwise = pairwise::compare_pairs(summaries, alpha);

    debug!(
        models = summaries.len(),
        paired = paired.len(),
        correlation_computed = primary.is_computed(),
        family_test = family_comparison.is_some(),
        pairs = pairwise.len(),
        "cross-model analysis complete"
    );

    Ok(CrossModelStatistics {
        n_models: summaries.len(),
        n_paired: paired.len(),
        alpha,
        descriptive,
        parameters_vs_hourly_success: primary,
        secondary_correlations,
        regression,
        family_comparison,
        pairwise,
    })
}
