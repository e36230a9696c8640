//! Per-model summary types.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::scoring::UnscoreableReason;

/// Declared metadata for one model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub id: String,
    /// Declared parameter count (a plain count, not "7B").
    pub parameters: u64,
    /// Architecture family used for group comparisons.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
}

impl ModelInfo {
    pub fn new(id: impl Into<String>, parameters: u64) -> Self {
        Self {
            id: id.into(),
            parameters,
            family: None,
        }
    }

    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = Some(family.into());
        self
    }
}

/// Letter grade derived from the hourly success percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// `>95` A+, `>85` A, `>75` B, `>60` C, `>40` D, otherwise F.
    pub fn from_pct(pct: f64) -> Self {
        if pct > 95.0 {
            Grade::APlus
        } else if pct > 85.0 {
            Grade::A
        } else if pct > 75.0 {
            Grade::B
        } else if pct > 60.0 {
            Grade::C
        } else if pct > 40.0 {
            Grade::D
        } else {
            Grade::F
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Two-sided interval, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntervalPct {
    pub lower: f64,
    pub upper: f64,
    pub level: f64,
}

/// Performance within one scenario category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySummary {
    pub attempted: usize,
    pub scoreable: usize,
    /// `None` when nothing in the category was scoreable.
    pub hourly_success_pct: Option<f64>,
    pub daily_mae: Option<f64>,
}

/// Aggregate over every scenario attempted by one model.
///
/// All `_pct` fields are percentages in `[0, 100]`. Statistics over
/// scoreable responses are `None` when nothing was scoreable.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub model_id: String,
    pub parameters: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    /// Scenarios attempted.
    pub total: usize,
    pub api_success_count: usize,
    /// Responses that normalised successfully, repairs included.
    pub json_valid_count: usize,
    pub scoreable_count: usize,
    /// Successes that needed at least one repair.
    pub repaired_count: usize,
    pub api_success_pct: f64,
    pub json_valid_pct: f64,

    /// Mean hourly match rate over scoreable responses.
    pub hourly_success_pct: Option<f64>,
    pub hourly_success_median_pct: Option<f64>,
    /// Sample standard deviation; needs at least two scoreable responses.
    pub hourly_success_sd_pct: Option<f64>,
    /// 95% t interval for the mean; needs at least two scoreable responses.
    pub hourly_success_ci: Option<IntervalPct>,

    /// Mean daily-total error over scoreable responses.
    pub daily_mae: Option<f64>,
    /// Daily-total error averaged over all attempts, charging the penalty for
    /// each unscoreable one.
    pub success_weighted_mae: f64,

    pub exact_24h_match_count: usize,
    /// Denominator is `scoreable_count`.
    pub exact_24h_match_pct: Option<f64>,

    pub mean_hourly_mae: Option<f64>,
    pub mean_hourly_rmse: Option<f64>,
    pub mean_cost_delta: Option<f64>,
    pub mean_target_error: Option<f64>,
    /// Hours over capacity, summed over scoreable responses.
    pub capacity_violations: usize,

    pub grade: Option<Grade>,

    /// Unscoreable count per reason.
    pub failures: BTreeMap<UnscoreableReason, usize>,
    /// Breakdown by scenario category; uncategorised scenarios are omitted.
    pub categories: BTreeMap<String, CategorySummary>,
    /// Hourly match percentage of each scoreable scenario, in input order.
    pub scenario_match_pct: Vec<f64>,
}
