//! Comparison of one candidate allocation against one scenario.

use std::collections::BTreeSet;
use std::fmt;

use lumen_normalize::{AllocationVector, FailureKind, HOURS, NormalizationResult, RepairKind};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ScoreConfig;
use crate::error::ScoreError;
use crate::scenario::ScenarioSpec;

/// Identifies which (model, scenario) pair a result belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioRef {
    pub scenario_id: String,
    pub model_id: String,
    /// Scenario category copied from the ground truth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ScenarioRef {
    fn new(model_id: &str, scenario: &ScenarioSpec) -> Self {
        Self {
            scenario_id: scenario.id().to_string(),
            model_id: model_id.to_string(),
            category: scenario.category().map(str::to_string),
        }
    }
}

/// Hour-by-hour comparison of two allocations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    /// Hours with `|candidate - truth| <= tolerance`.
    pub hourly_match_count: usize,
    pub per_hour_abs_error: [f64; HOURS],
    /// `|Σ candidate - Σ truth|`.
    pub daily_total_error: f64,
}

impl Comparison {
    /// Fraction of matching hours in `[0, 1]`.
    pub fn hourly_match_rate(&self) -> f64 {
        self.hourly_match_count as f64 / HOURS as f64
    }

    /// All 24 hours match.
    pub fn exact_24h_match(&self) -> bool {
        self.hourly_match_count == HOURS
    }
}

/// Compares `candidate` to `truth` hour by hour with an absolute tolerance.
///
/// # Panics
///
/// Panics if `tolerance` is negative or not finite.
pub fn compare(
    candidate: &AllocationVector,
    truth: &AllocationVector,
    tolerance: f64,
) -> Comparison {
    assert!(
        tolerance.is_finite() && tolerance >= 0.0,
        "compare: tolerance must be finite and >= 0, got {tolerance}"
    );
    let mut per_hour_abs_error = [0.0; HOURS];
    let mut hourly_match_count = 0;
    for (h, err) in per_hour_abs_error.iter_mut().enumerate() {
        *err = (candidate.get(h) - truth.get(h)).abs();
        if *err <= tolerance {
            hourly_match_count += 1;
        }
    }
    Comparison {
        hourly_match_count,
        per_hour_abs_error,
        daily_total_error: (candidate.total() - truth.total()).abs(),
    }
}

/// A scored (model, scenario) pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioScore {
    #[serde(flatten)]
    pub scenario: ScenarioRef,
    /// Hours matching within tolerance (0-24).
    pub hourly_match_count: usize,
    /// `hourly_match_count / 24`, in `[0, 1]`.
    pub hourly_match_rate: f64,
    pub per_hour_abs_error: [f64; HOURS],
    pub daily_total_error: f64,
    pub exact_24h_match: bool,
    /// Mean of the per-hour errors.
    pub hourly_mae: f64,
    /// Root mean square of the per-hour errors.
    pub hourly_rmse: f64,
    pub candidate_total: f64,
    /// `|Σ candidate - daily_target|`.
    pub target_error: f64,
    /// Hours where the candidate exceeds capacity by more than the tolerance.
    pub capacity_violations: usize,
    /// Candidate cost minus optimal cost.
    pub cost_delta: f64,
    /// Repairs the normaliser applied to reach the candidate.
    pub repairs: BTreeSet<RepairKind>,
}

/// Why a (model, scenario) pair has no score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnscoreableReason {
    /// The request itself failed; there was never any text.
    ApiFailure,
    EmptyResponse,
    ParseError,
    MissingAllocationField,
    MalformedAllocation,
}

impl UnscoreableReason {
    /// Counts against API success rather than JSON validity.
    ///
    /// An empty response carries no text at all, so it is treated as a failed
    /// call.
    pub fn is_api_failure(&self) -> bool {
        matches!(
            self,
            UnscoreableReason::ApiFailure | UnscoreableReason::EmptyResponse
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnscoreableReason::ApiFailure => "api_failure",
            UnscoreableReason::EmptyResponse => "empty_response",
            UnscoreableReason::ParseError => "parse_error",
            UnscoreableReason::MissingAllocationField => "missing_allocation_field",
            UnscoreableReason::MalformedAllocation => "malformed_allocation",
        }
    }
}

impl fmt::Display for UnscoreableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<FailureKind> for UnscoreableReason {
    fn from(kind: FailureKind) -> Self {
        match kind {
            FailureKind::EmptyResponse => UnscoreableReason::EmptyResponse,
            FailureKind::ParseError => UnscoreableReason::ParseError,
            FailureKind::MissingAllocationField => UnscoreableReason::MissingAllocationField,
            FailureKind::MalformedAllocation => UnscoreableReason::MalformedAllocation,
        }
    }
}

/// A (model, scenario) pair that produced no comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unscoreable {
    #[serde(flatten)]
    pub scenario: ScenarioRef,
    pub reason: UnscoreableReason,
}

/// Either a score or the reason there is none.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ScenarioResult {
    Scored(ScenarioScore),
    Unscoreable(Unscoreable),
}

impl ScenarioResult {
    /// The (model, scenario) pair this result belongs to.
    pub fn scenario(&self) -> &ScenarioRef {
        match self {
            ScenarioResult::Scored(s) => &s.scenario,
            ScenarioResult::Unscoreable(u) => &u.scenario,
        }
    }

    pub fn as_scored(&self) -> Option<&ScenarioScore> {
        match self {
            ScenarioResult::Scored(s) => Some(s),
            ScenarioResult::Unscoreable(_) => None,
        }
    }

    pub fn unscoreable_reason(&self) -> Option<UnscoreableReason> {
        match self {
            ScenarioResult::Scored(_) => None,
            ScenarioResult::Unscoreable(u) => Some(u.reason),
        }
    }
}

/// Marks a (model, scenario) pair unscoreable without looking at any text.
pub fn unscoreable(
    model_id: &str,
    scenario: &ScenarioSpec,
    reason: UnscoreableReason,
) -> ScenarioResult {
    ScenarioResult::Unscoreable(Unscoreable {
        scenario: ScenarioRef::new(model_id, scenario),
        reason,
    })
}

/// Scores one normalised response against its scenario.
///
/// A failed normalisation becomes [`ScenarioResult::Unscoreable`] with the
/// matching reason; no comparison is attempted.
///
/// # Errors
///
/// [`ScoreError::InvalidTolerance`] / [`ScoreError::InvalidPenalty`] if
/// `config` is invalid.
pub fn score(
    model_id: &str,
    candidate: &NormalizationResult,
    scenario: &ScenarioSpec,
    config: &ScoreConfig,
) -> Result<ScenarioResult, ScoreError> {
    config.validate()?;
    let (vector, repairs) = match candidate {
        NormalizationResult::Success { vector, repairs } => (vector, repairs),
        NormalizationResult::Failure { kind, .. } => {
            debug!(model = model_id, scenario = scenario.id(), %kind, "unscoreable");
            return Ok(unscoreable(model_id, scenario, (*kind).into()));
        }
    };

    let tolerance = config.tolerance();
    let truth = scenario.optimal();
    let cmp = compare(vector, truth, tolerance);

    let hourly_mae = cmp.per_hour_abs_error.iter().sum::<f64>() / HOURS as f64;
    let hourly_rmse = (cmp.per_hour_abs_error.iter().map(|e| e * e).sum::<f64>()
        / HOURS as f64)
        .sqrt();
    let candidate_total = vector.total();
    let capacity_violations = vector
        .as_slice()
        .iter()
        .zip(scenario.capacity())
        .filter(|(a, cap)| **a > **cap + tolerance)
        .count();

    Ok(ScenarioResult::Scored(ScenarioScore {
        scenario: ScenarioRef::new(model_id, scenario),
        hourly_match_count: cmp.hourly_match_count,
        hourly_match_rate: cmp.hourly_match_rate(),
        per_hour_abs_error: cmp.per_hour_abs_error,
        daily_total_error: cmp.daily_total_error,
        exact_24h_match: cmp.exact_24h_match(),
        hourly_mae,
        hourly_rmse,
        candidate_total,
        target_error: (candidate_total - scenario.daily_target()).abs(),
        capacity_violations,
        cost_delta: scenario.cost_of(vector) - scenario.cost_of(truth),
        repairs: repairs.clone(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn vector(f: impl Fn(usize) -> f64) -> AllocationVector {
        AllocationVector::new((0..HOURS).map(f).collect()).unwrap()
    }

    fn scenario() -> ScenarioSpec {
        let optimal = vector(|h| if h == 10 || h == 11 { 300.0 } else { 0.0 });
        let prices = (0..HOURS).map(|h| if h < 12 { 0.1 } else { 0.2 }).collect();
        ScenarioSpec::new("s1", 600.0, prices, vec![350.0; HOURS], optimal)
            .unwrap()
            .with_category("spring")
    }

    fn success(v: AllocationVector) -> NormalizationResult {
        NormalizationResult::Success {
            vector: v,
            repairs: BTreeSet::new(),
        }
    }

    #[test]
    fn test_compare_identical() {
        let v = vector(|h| h as f64);
        let cmp = compare(&v, &v, 1e-6);
        assert_eq!(cmp.hourly_match_count, 24);
        assert!(cmp.exact_24h_match());
        assert_eq!(cmp.hourly_match_rate(), 1.0);
        assert_eq!(cmp.daily_total_error, 0.0);
    }

    #[test]
    fn test_compare_tolerance_is_absolute() {
        let truth = AllocationVector::zeros();
        let cand = vector(|h| if h == 0 { 0.4 } else { 0.0 });
        assert_eq!(compare(&cand, &truth, 0.5).hourly_match_count, 24);
        assert_eq!(compare(&cand, &truth, 0.1).hourly_match_count, 23);
    }

    #[test]
    fn test_score_exact() {
        let s = scenario();
        let result = score("m", &success(*s.optimal()), &s, &ScoreConfig::default()).unwrap();
        let scored = result.as_scored().unwrap();
        assert!(scored.exact_24h_match);
        assert_eq!(scored.hourly_match_rate, 1.0);
        assert_eq!(scored.daily_total_error, 0.0);
        assert_eq!(scored.cost_delta, 0.0);
        assert_eq!(scored.capacity_violations, 0);
        assert_eq!(scored.target_error, 0.0);
        assert_eq!(scored.scenario.category.as_deref(), Some("spring"));
    }

    #[test]
    fn test_score_extra_metrics() {
        let s = scenario();
        // Moves 300 from hour 10 (price 0.1) to hour 20 (price 0.2) at 400,
        // above the 350 capacity.
        let cand = vector(|h| match h {
            11 => 300.0,
            20 => 400.0,
            _ => 0.0,
        });
        let result = score("m", &success(cand), &s, &ScoreConfig::default()).unwrap();
        let scored = result.as_scored().unwrap();
        assert_eq!(scored.hourly_match_count, 22);
        assert!(!scored.exact_24h_match);
        assert_relative_eq!(scored.daily_total_error, 100.0, epsilon = 1e-9);
        assert_relative_eq!(scored.target_error, 100.0, epsilon = 1e-9);
        assert_relative_eq!(scored.candidate_total, 700.0, epsilon = 1e-9);
        assert_relative_eq!(scored.hourly_mae, 700.0 / 24.0, epsilon = 1e-9);
        assert_relative_eq!(
            scored.hourly_rmse,
            ((300.0f64.powi(2) + 400.0f64.powi(2)) / 24.0).sqrt(),
            epsilon = 1e-9
        );
        assert_eq!(scored.capacity_violations, 1);
        // 300*0.1 + 400*0.2 - (300*0.1 + 300*0.1) = 110 - 60
        assert_relative_eq!(scored.cost_delta, 50.0, epsilon = 1e-9);
    }

    #[test]
    fn test_score_failure_is_unscoreable() {
        let s = scenario();
        let failed = NormalizationResult::Failure {
            kind: FailureKind::MalformedAllocation,
            raw_text: "x".to_string(),
        };
        let result = score("m", &failed, &s, &ScoreConfig::default()).unwrap();
        assert_eq!(
            result.unscoreable_reason(),
            Some(UnscoreableReason::MalformedAllocation)
        );
        assert_eq!(result.scenario().scenario_id, "s1");
        assert!(result.as_scored().is_none());
    }

    #[test]
    fn test_score_rejects_invalid_tolerance() {
        let s = scenario();
        let candidate = success(*s.optimal());
        for tolerance in [-1e-3, f64::NAN, f64::INFINITY] {
            let config = ScoreConfig::default().with_tolerance(tolerance);
            let err = score("m", &candidate, &s, &config).unwrap_err();
            assert!(matches!(err, ScoreError::InvalidTolerance { .. }));
        }
    }

    #[test]
    #[should_panic(expected = "tolerance must be finite")]
    fn test_compare_panics_on_negative_tolerance() {
        let v = vector(|_| 1.0);
        compare(&v, &v, -1.0);
    }

    #[test]
    fn test_reason_mapping_and_api_policy() {
        assert_eq!(
            UnscoreableReason::from(FailureKind::EmptyResponse),
            UnscoreableReason::EmptyResponse
        );
        assert!(UnscoreableReason::ApiFailure.is_api_failure());
        assert!(UnscoreableReason::EmptyResponse.is_api_failure());
        assert!(!UnscoreableReason::ParseError.is_api_failure());
        assert_eq!(
            UnscoreableReason::MissingAllocationField.to_string(),
            "missing_allocation_field"
        );
    }

    #[test]
    fn test_result_serialises_with_outcome_tag() {
        let s = scenario();
        let result = unscoreable("m", &s, UnscoreableReason::ApiFailure);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outcome"], "unscoreable");
        assert_eq!(json["reason"], "api_failure");
        assert_eq!(json["scenario_id"], "s1");
        assert_eq!(json["model_id"], "m");
    }
}
