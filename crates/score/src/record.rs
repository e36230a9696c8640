//! Scoring of collected response records.

use lumen_normalize::normalize_value;
use serde::Deserialize;
use serde_json::Value;
use tracing::trace;

use crate::config::ScoreConfig;
use crate::error::ScoreError;
use crate::scenario::GroundTruth;
use crate::scoring::{ScenarioResult, UnscoreableReason, score, unscoreable};

/// One collected model response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseRecord {
    pub scenario_id: String,
    pub model_id: String,
    /// Raw text, an already-decoded JSON value, or `null`.
    #[serde(default)]
    pub response: Value,
    /// The request failed before any text was received.
    #[serde(default)]
    pub api_failure: bool,
}

impl ResponseRecord {
    /// A record holding response text.
    pub fn text(
        scenario_id: impl Into<String>,
        model_id: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            model_id: model_id.into(),
            response: Value::String(response.into()),
            api_failure: false,
        }
    }

    /// A record for a failed request.
    pub fn failed(scenario_id: impl Into<String>, model_id: impl Into<String>) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            model_id: model_id.into(),
            response: Value::Null,
            api_failure: true,
        }
    }
}

/// Normalises and scores one record.
///
/// Records flagged as API failures skip normalisation entirely.
///
/// # Errors
///
/// Returns [`ScoreError::UnknownScenario`] if the ground truth has no
/// scenario with the record's id, or a config error if `config` is invalid.
pub fn score_record(
    record: &ResponseRecord,
    ground_truth: &impl GroundTruth,
    config: &ScoreConfig,
) -> Result<ScenarioResult, ScoreError> {
    config.validate()?;
    let scenario =
        ground_truth
            .get(&record.scenario_id)
            .ok_or_else(|| ScoreError::UnknownScenario {
                id: record.scenario_id.clone(),
            })?;

    if record.api_failure {
        trace!(model = %record.model_id, scenario = %record.scenario_id, "api failure");
        return Ok(unscoreable(
            &record.model_id,
            scenario,
            UnscoreableReason::ApiFailure,
        ));
    }

    let normalized = normalize_value(&record.response);
    score(&record.model_id, &normalized, scenario, config)
}
