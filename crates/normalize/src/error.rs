//! Error types for the lumen-normalize crate.

/// Returned when an [`AllocationVector`](crate::AllocationVector) cannot be
/// built from the supplied values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AllocationError {
    /// The value count is not 24.
    #[error("allocation must have 24 hourly values, got {len}")]
    WrongLength {
        /// Number of values supplied.
        len: usize,
    },

    /// An hour holds NaN or infinity.
    #[error("non-finite allocation at hour {hour}")]
    NonFinite {
        /// Hour of day (0-23).
        hour: usize,
    },

    /// An hour holds a negative value.
    #[error("negative allocation {value} at hour {hour}")]
    Negative {
        /// Hour of day (0-23).
        hour: usize,
        /// The offending value.
        value: f64,
    },
}
