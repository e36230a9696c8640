//! Scoring configuration.

use crate::error::ScoreError;

/// Default absolute tolerance for an hourly match.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default per-scenario penalty charged to unscoreable responses in the
/// success-weighted MAE.
pub const DEFAULT_PENALTY: f64 = 10_000.0;

/// Configuration shared by the scorer and the aggregator.
///
/// # Example
///
/// ```
/// use lumen_score::ScoreConfig;
///
/// let config = ScoreConfig::default().with_tolerance(0.5);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.penalty(), 10_000.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreConfig {
    /// Absolute tolerance for `|candidate - truth|` per hour.
    tolerance: f64,
    /// Daily-error units charged per unscoreable scenario.
    penalty: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            penalty: DEFAULT_PENALTY,
        }
    }
}

impl ScoreConfig {
    /// Sets the hourly match tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the unscoreable penalty.
    pub fn with_penalty(mut self, penalty: f64) -> Self {
        self.penalty = penalty;
        self
    }

    /// Returns the hourly match tolerance.
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Returns the unscoreable penalty.
    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    /// Validates this configuration.
    ///
    /// Both values must be finite and non-negative.
    pub fn validate(&self) -> Result<(), ScoreError> {
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(ScoreError::InvalidTolerance {
                tolerance: self.tolerance,
            });
        }
        if !self.penalty.is_finite() || self.penalty < 0.0 {
            return Err(ScoreError::InvalidPenalty {
                penalty: self.penalty,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScoreConfig::default();
        assert_eq!(config.tolerance(), 1e-6);
        assert_eq!(config.penalty(), 10_000.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = ScoreConfig::default()
            .with_tolerance(0.0)
            .with_penalty(500.0);
        assert_eq!(config.tolerance(), 0.0);
        assert_eq!(config.penalty(), 500.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert_eq!(
            ScoreConfig::default().with_tolerance(-1e-3).validate(),
            Err(ScoreError::InvalidTolerance { tolerance: -1e-3 })
        );
        assert!(
            ScoreConfig::default()
                .with_tolerance(f64::INFINITY)
                .validate()
                .is_err()
        );
        assert_eq!(
            ScoreConfig::default().with_penalty(-5.0).validate(),
            Err(ScoreError::InvalidPenalty { penalty: -5.0 })
        );
    }
}
