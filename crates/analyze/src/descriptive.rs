//! Across-model descriptive statistics.

use serde::Serialize;

use crate::outcome::Outcome;

/// Summary of one per-model metric across models.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Descriptive {
    pub n: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` for a single model.
    pub sd: Option<f64>,
    pub min: f64,
    pub max: f64,
}

impl Descriptive {
    /// Describes the finite entries of `values`; `None` if there are none.
    pub fn of(values: &[f64]) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return None;
        }
        let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Self {
            n: finite.len(),
            mean: lumen_stats::mean(&finite),
            sd: (finite.len() >= 2).then(|| lumen_stats::sd(&finite)),
            min,
            max,
        })
    }
}

/// Descriptive statistics of every per-model metric the analyzer reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescriptiveSet {
    pub parameters: Outcome<Descriptive>,
    pub hourly_success_pct: Outcome<Descriptive>,
    pub api_success_pct: Outcome<Descriptive>,
    pub json_valid_pct: Outcome<Descriptive>,
    pub success_weighted_mae: Outcome<Descriptive>,
}

pub(crate) fn describe(values: &[f64]) -> Outcome<Descriptive> {
    Outcome::from_option(Descriptive::of(values), "no models with a value")
}
