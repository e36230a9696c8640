//! The canonical 24-hour allocation vector.

use serde::{Deserialize, Serialize};

use crate::error::AllocationError;

/// Hours in a day; the fixed length of every allocation.
pub const HOURS: usize = 24;

/// Key under which [`AllocationVector::to_canonical_json`] writes the hourly
/// mapping.
pub const CANONICAL_KEY: &str = "allocation_PPFD_per_hour";

/// Exactly 24 finite, non-negative hourly values (hour 0 first).
///
/// Immutable once constructed; the only way in is [`AllocationVector::new`],
/// which enforces the invariants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct AllocationVector([f64; HOURS]);

impl AllocationVector {
    /// Builds a vector from exactly 24 finite, non-negative values.
    ///
    /// # Errors
    ///
    /// Returns [`AllocationError::WrongLength`], [`AllocationError::NonFinite`]
    /// or [`AllocationError::Negative`] for the first violation found.
    pub fn new(values: Vec<f64>) -> Result<Self, AllocationError> {
        let values: [f64; HOURS] = values
            .try_into()
            .map_err(|v: Vec<f64>| AllocationError::WrongLength { len: v.len() })?;
        for (hour, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(AllocationError::NonFinite { hour });
            }
            if value < 0.0 {
                return Err(AllocationError::Negative { hour, value });
            }
        }
        Ok(Self(values))
    }

    /// All-zero allocation.
    pub fn zeros() -> Self {
        Self([0.0; HOURS])
    }

    /// Hourly values, hour 0 first.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Value at `hour`. Panics if `hour >= 24`.
    pub fn get(&self, hour: usize) -> f64 {
        self.0[hour]
    }

    /// Sum over all hours.
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }

    /// Serialises as `{"allocation_PPFD_per_hour": {"hour_0": .., ..}}`.
    ///
    /// Normalising this text yields the same vector with no repairs.
    pub fn to_canonical_json(&self) -> String {
        let hours: serde_json::Map<String, serde_json::Value> = self
            .0
            .iter()
            .enumerate()
            .map(|(h, &v)| (format!("hour_{h}"), serde_json::Value::from(v)))
            .collect();
        let mut root = serde_json::Map::new();
        root.insert(CANONICAL_KEY.to_string(), serde_json::Value::Object(hours));
        serde_json::Value::Object(root).to_string()
    }
}

impl TryFrom<Vec<f64>> for AllocationVector {
    type Error = AllocationError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

impl From<AllocationVector> for Vec<f64> {
    fn from(v: AllocationVector) -> Self {
        v.0.to_vec()
    }
}
