//! Explicit "computed or not" wrapper for analysis results.

use serde::Serialize;

/// A statistic that was either computed or could not be, with the reason.
///
/// Serialises as `{"status": "computed", "value": ...}` or
/// `{"status": "insufficient_data", "reason": "..."}` so that a missing
/// result is never confused with a zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    Computed { value: T },
    InsufficientData { reason: String },
}

impl<T> Outcome<T> {
    pub fn computed(value: T) -> Self {
        Outcome::Computed { value }
    }

    pub fn insufficient(reason: impl Into<String>) -> Self {
        Outcome::InsufficientData {
            reason: reason.into(),
        }
    }

    /// Wraps an optional value, using `reason` when it is `None`.
    pub fn from_option(value: Option<T>, reason: impl Into<String>) -> Self {
        match value {
            Some(value) => Outcome::computed(value),
            None => Outcome::insufficient(reason),
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, Outcome::Computed { .. })
    }

    /// The computed value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Computed { value } => Some(value),
            Outcome::InsufficientData { .. } => None,
        }
    }

    /// The reason nothing was computed, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Outcome::Computed { .. } => None,
            Outcome::InsufficientData { reason } => Some(reason),
        }
    }
}
