//! Analyzer configuration.

use crate::error::AnalyzeError;

/// Configuration for [`analyze`](crate::analyze).
///
/// # Example
///
/// ```
/// use lumen_analyze::AnalyzeConfig;
///
/// let config = AnalyzeConfig::default()
///     .with_bootstrap_iterations(200)
///     .with_seed(Some(7));
/// assert!(config.validate().is_ok());
/// assert_eq!(config.alpha(), 0.05);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeConfig {
    bootstrap_iterations: usize,
    seed: Option<u64>,
    alpha: f64,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            bootstrap_iterations: 1000,
            seed: Some(42),
            alpha: 0.05,
        }
    }
}

impl AnalyzeConfig {
    /// Sets the number of bootstrap resamples. `0` skips resampling.
    pub fn with_bootstrap_iterations(mut self, iterations: usize) -> Self {
        self.bootstrap_iterations = iterations;
        self
    }

    /// Sets the bootstrap seed. `None` draws from OS entropy.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the significance level used for every "significant" flag.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn bootstrap_iterations(&self) -> usize {
        self.bootstrap_iterations
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Validates this configuration.
    ///
    /// Zero bootstrap iterations is allowed and yields an empty bootstrap.
    pub fn validate(&self) -> Result<(), AnalyzeError> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(AnalyzeError::InvalidAlpha { alpha: self.alpha });
        }
        Ok(())
    }
}
