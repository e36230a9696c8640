//! Cross-model statistics and the serialised analysis report.

use serde::Serialize;

use lumen_score::ModelSummary;

use crate::correlation::CorrelationReport;
use crate::descriptive::DescriptiveSet;
use crate::error::AnalyzeError;
use crate::groups::GroupComparison;
use crate::outcome::Outcome;
use crate::pairwise::PairwiseComparison;
use crate::regression::RegressionReport;

/// Correlations of declared size against the secondary metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecondaryCorrelations {
    pub parameters_vs_api_success_pct: Outcome<CorrelationReport>,
    pub parameters_vs_json_valid_pct: Outcome<CorrelationReport>,
    pub parameters_vs_success_weighted_mae: Outcome<CorrelationReport>,
}

/// Everything [`analyze`](crate::analyze) computes across models.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossModelStatistics {
    pub n_models: usize,
    /// Models with a non-null hourly success percentage.
    pub n_paired: usize,
    pub alpha: f64,
    pub descriptive: DescriptiveSet,
    /// Primary result, with a bootstrap interval for Pearson r.
    pub parameters_vs_hourly_success: Outcome<CorrelationReport>,
    pub secondary_correlations: SecondaryCorrelations,
    pub regression: RegressionReport,
    /// Omitted unless at least two families have two or more members.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_comparison: Option<GroupComparison>,
    pub pairwise: Vec<PairwiseComparison>,
}

/// Per-model summaries plus the cross-model statistics over them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub summaries: Vec<ModelSummary>,
    pub statistics: CrossModelStatistics,
}

impl AnalysisReport {
    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, AnalyzeError> {
        to_json(self)
    }
}

/// Serialises any report value as pretty-printed JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, AnalyzeError> {
    serde_json::to_string_pretty(value).map_err(|e| AnalyzeError::Serialization {
        reason: e.to_string(),
    })
}
