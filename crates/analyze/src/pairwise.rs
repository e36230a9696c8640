//! Pairwise model comparisons on per-scenario hourly match percentages.

use serde::Serialize;

use lumen_score::ModelSummary;

/// Magnitude label for Cohen's d.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectSize {
    Small,
    Medium,
    Large,
}

impl EffectSize {
    /// `d > 0.8` large, `d > 0.5` medium, otherwise small.
    pub fn from_d(d: f64) -> Self {
        if d > 0.8 {
            EffectSize::Large
        } else if d > 0.5 {
            EffectSize::Medium
        } else {
            EffectSize::Small
        }
    }
}

/// Student t-test between two models' per-scenario match percentages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairwiseComparison {
    pub model_a: String,
    pub model_b: String,
    pub mean_a_pct: f64,
    pub mean_b_pct: f64,
    pub t_statistic: f64,
    pub df: f64,
    pub p_value: f64,
    pub significant: bool,
    /// Absolute Cohen's d.
    pub cohens_d: f64,
    pub effect: EffectSize,
}

/// Compares every pair of models, in input order, whose scoreable scenario
/// count is at least two. Pairs whose pooled variance is zero are skipped.
pub(crate) fn compare_pairs(summaries: &[ModelSummary], alpha: f64) -> Vec<PairwiseComparison> {
    let eligible: Vec<&ModelSummary> = summaries
        .iter()
        .filter(|s| s.scenario_match_pct.len() >= 2)
        .collect();

    let mut comparisons = Vec::new();
    for (i, a) in eligible.iter().enumerate() {
        for b in &eligible[i + 1..] {
            let (xa, xb) = (&a.scenario_match_pct, &b.scenario_match_pct);
            let (Some(t), Some(d)) = (
                lumen_stats::student_t_test(xa, xb),
                lumen_stats::cohens_d(xa, xb),
            ) else {
                continue;
            };
            comparisons.push(PairwiseComparison {
                model_a: a.model_id.clone(),
                model_b: b.model_id.clone(),
                mean_a_pct: lumen_stats::mean(xa),
                mean_b_pct: lumen_stats::mean(xb),
                t_statistic: t.statistic,
                df: t.df,
                p_value: t.p_value,
                significant: t.p_value < alpha,
                cohens_d: d,
                effect: EffectSize::from_d(d),
            });
        }
    }
    comparisons
}
