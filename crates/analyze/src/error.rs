//! Analyzer error types.

/// Errors returned by [`analyze`](crate::analyze) and report serialisation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalyzeError {
    /// The significance level must lie strictly between 0 and 1.
    #[error("alpha must be in (0, 1), got {alpha}")]
    InvalidAlpha { alpha: f64 },

    /// A model declared a parameter count of zero.
    #[error("model '{model}' has a parameter count of zero")]
    InvalidParameters { model: String },

    /// Two summaries share a model id.
    #[error("duplicate summary for model '{model}'")]
    DuplicateModel { model: String },

    /// JSON serialization failed.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },
}
