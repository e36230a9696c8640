//! Pure conversion functions: TOML/JSON structs -> crate API types.

use std::collections::BTreeSet;

use anyhow::{Context, Result, bail};

use lumen_analyze::AnalyzeConfig;
use lumen_normalize::{AllocationVector, HOURS};
use lumen_score::{ModelInfo, ScenarioSpec, ScoreConfig};

use crate::config::{AnalysisToml, ModelToml, ScoringToml};
use crate::load::{CapacityJson, GroundTruthRecord};

/// Builds a validated [`ScoreConfig`] from the `[scoring]` table.
pub fn build_score_config(scoring: &ScoringToml) -> Result<ScoreConfig> {
    let cfg = ScoreConfig::default()
        .with_tolerance(scoring.tolerance)
        .with_penalty(scoring.penalty);
    cfg.validate().context("invalid [scoring] config")?;
    Ok(cfg)
}

/// Builds a validated [`AnalyzeConfig`] from the `[analysis]` table.
///
/// A `--seed` given on the command line wins over the file.
pub fn build_analyze_config(
    analysis: &AnalysisToml,
    seed_override: Option<u64>,
) -> Result<AnalyzeConfig> {
    let seed = match (seed_override, analysis.random_seed) {
        (Some(s), _) => Some(s),
        (None, true) => None,
        (None, false) => analysis.seed,
    };
    let cfg = AnalyzeConfig::default()
        .with_bootstrap_iterations(analysis.bootstrap_iterations)
        .with_seed(seed)
        .with_alpha(analysis.alpha);
    cfg.validate().context("invalid [analysis] config")?;
    Ok(cfg)
}

/// Checks the `[[models]]` list and converts it to [`ModelInfo`]s, keeping
/// the configured order.
pub fn build_models(models: &[ModelToml]) -> Result<Vec<ModelInfo>> {
    if models.is_empty() {
        bail!("no models configured: add at least one [[models]] entry");
    }
    let mut seen = BTreeSet::new();
    let mut infos = Vec::with_capacity(models.len());
    for m in models {
        if m.id.trim().is_empty() {
            bail!("model id must not be empty");
        }
        if m.parameters == 0 {
            bail!("model '{}': parameters must be positive", m.id);
        }
        if !seen.insert(m.id.as_str()) {
            bail!("model '{}' is configured more than once", m.id);
        }
        let mut info = ModelInfo::new(&m.id, m.parameters);
        if let Some(ref family) = m.family {
            info = info.with_family(family);
        }
        infos.push(info);
    }
    Ok(infos)
}

/// Converts one ground-truth record into a validated [`ScenarioSpec`].
pub fn build_scenario(record: GroundTruthRecord) -> Result<ScenarioSpec> {
    let capacity = match record.capacity {
        CapacityJson::Uniform(c) => vec![c; HOURS],
        CapacityJson::Hourly(values) => values,
    };
    let optimal = AllocationVector::new(record.optimal)
        .with_context(|| format!("invalid optimal allocation for scenario '{}'", record.id))?;
    let spec = ScenarioSpec::new(
        record.id,
        record.daily_target,
        record.prices,
        capacity,
        optimal,
    )?;
    Ok(match record.category {
        Some(category) => spec.with_category(category),
        None => spec,
    })
}
