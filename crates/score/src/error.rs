//! Error types for the lumen-score crate.
//!
//! These cover caller contract violations only. A response that cannot be
//! scored is an [`Unscoreable`](crate::Unscoreable) value, not an error.

/// Errors from scenario construction, configuration and record scoring.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    /// A ground-truth scenario failed validation.
    #[error("invalid scenario '{id}': {reason}")]
    InvalidScenario { id: String, reason: String },

    /// Two scenarios share an id.
    #[error("duplicate scenario id '{id}'")]
    DuplicateScenario { id: String },

    /// A response references a scenario the ground truth does not know.
    #[error("unknown scenario '{id}'")]
    UnknownScenario { id: String },

    /// Match tolerance is negative or non-finite.
    #[error("tolerance must be finite and >= 0, got {tolerance}")]
    InvalidTolerance { tolerance: f64 },

    /// Unscoreable penalty is negative or non-finite.
    #[error("penalty must be finite and >= 0, got {penalty}")]
    InvalidPenalty { penalty: f64 },
}

/// Errors from folding scenario results into a model summary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AggregateError {
    /// No scenario results were supplied.
    #[error("no scenario results for model '{model}'")]
    EmptyResults { model: String },

    /// A result belongs to a different model.
    #[error("result for scenario '{scenario}' belongs to model '{found}', expected '{expected}'")]
    ModelMismatch {
        expected: String,
        found: String,
        scenario: String,
    },

    /// The scoring configuration is invalid.
    #[error(transparent)]
    Config(#[from] ScoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_scenario_display() {
        let err = ScoreError::InvalidScenario {
            id: "s1".to_string(),
            reason: "daily target must be positive".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid scenario 's1': daily target must be positive"
        );
    }

    #[test]
    fn test_unknown_and_duplicate_display() {
        let err = ScoreError::UnknownScenario {
            id: "x".to_string(),
        };
        assert_eq!(err.to_string(), "unknown scenario 'x'");
        let err = ScoreError::DuplicateScenario {
            id: "x".to_string(),
        };
        assert_eq!(err.to_string(), "duplicate scenario id 'x'");
    }

    #[test]
    fn test_config_display() {
        let err = ScoreError::InvalidTolerance { tolerance: -1.0 };
        assert!(err.to_string().contains("got -1"));
        let err = ScoreError::InvalidPenalty {
            penalty: f64::NAN,
        };
        assert!(err.to_string().contains("NaN"));
    }

    #[test]
    fn test_aggregate_display() {
        let err = AggregateError::EmptyResults {
            model: "m".to_string(),
        };
        assert_eq!(err.to_string(), "no scenario results for model 'm'");

        let err = AggregateError::ModelMismatch {
            expected: "a".to_string(),
            found: "b".to_string(),
            scenario: "s1".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'s1'"));
        assert!(msg.contains("model 'b'"));
        assert!(msg.contains("expected 'a'"));

        let err: AggregateError = ScoreError::InvalidTolerance { tolerance: -2.0 }.into();
        assert!(err.to_string().starts_with("tolerance must be"));
    }
}
