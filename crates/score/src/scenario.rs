//! Ground-truth scenarios and their lookup.

use std::collections::BTreeMap;

use lumen_normalize::{AllocationVector, HOURS};

use crate::error::ScoreError;

/// One optimisation task instance with its optimal allocation.
///
/// Validated at construction and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioSpec {
    id: String,
    daily_target: f64,
    prices: [f64; HOURS],
    capacity: [f64; HOURS],
    optimal: AllocationVector,
    category: Option<String>,
}

impl ScenarioSpec {
    /// Creates a validated scenario.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::InvalidScenario`] if the id is empty, the daily
    /// target is not a positive finite number, or `prices` / `capacity` are
    /// not 24 finite non-negative values.
    pub fn new(
        id: impl Into<String>,
        daily_target: f64,
        prices: Vec<f64>,
        capacity: Vec<f64>,
        optimal: AllocationVector,
    ) -> Result<Self, ScoreError> {
        let id = id.into();
        let invalid = |reason: String| ScoreError::InvalidScenario {
            id: id.clone(),
            reason,
        };

        if id.trim().is_empty() {
            return Err(invalid("id must not be empty".to_string()));
        }
        if !daily_target.is_finite() || daily_target <= 0.0 {
            return Err(invalid(format!(
                "daily target must be positive, got {daily_target}"
            )));
        }
        let prices = hourly("prices", prices).map_err(&invalid)?;
        let capacity = hourly("capacity", capacity).map_err(&invalid)?;

        Ok(Self {
            id,
            daily_target,
            prices,
            capacity,
            optimal,
            category: None,
        })
    }

    /// Tags the scenario with a category (e.g. a season).
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn daily_target(&self) -> f64 {
        self.daily_target
    }

    /// Electricity price per hour.
    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    /// Upper allocation limit per hour.
    pub fn capacity(&self) -> &[f64] {
        &self.capacity
    }

    /// The optimal allocation this scenario is scored against.
    pub fn optimal(&self) -> &AllocationVector {
        &self.optimal
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// `Σ allocation[h] * price[h]`.
    pub fn cost_of(&self, allocation: &AllocationVector) -> f64 {
        allocation
            .as_slice()
            .iter()
            .zip(self.prices.iter())
            .map(|(a, p)| a * p)
            .sum()
    }
}

fn hourly(name: &str, values: Vec<f64>) -> Result<[f64; HOURS], String> {
    let values: [f64; HOURS] = values
        .try_into()
        .map_err(|v: Vec<f64>| format!("{name} must have 24 values, got {}", v.len()))?;
    if let Some(hour) = values.iter().position(|v| !v.is_finite() || *v < 0.0) {
        return Err(format!(
            "{name} at hour {hour} must be finite and >= 0, got {}",
            values[hour]
        ));
    }
    Ok(values)
}

/// Lookup of ground truth by scenario id.
pub trait GroundTruth {
    /// Returns the scenario, or `None` if the id is unknown.
    fn get(&self, scenario_id: &str) -> Option<&ScenarioSpec>;
}

/// Ground truth held in memory, keyed by scenario id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGroundTruth {
    scenarios: BTreeMap<String, ScenarioSpec>,
}

impl InMemoryGroundTruth {
    /// Builds the lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ScoreError::DuplicateScenario`] if two scenarios share an id.
    pub fn new(scenarios: impl IntoIterator<Item = ScenarioSpec>) -> Result<Self, ScoreError> {
        let mut map = BTreeMap::new();
        for scenario in scenarios {
            let id = scenario.id().to_string();
            if map.insert(id.clone(), scenario).is_some() {
                return Err(ScoreError::DuplicateScenario { id });
            }
        }
        Ok(Self { scenarios: map })
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Scenarios in id order.
    pub fn iter(&self) -> impl Iterator<Item = &ScenarioSpec> {
        self.scenarios.values()
    }
}

impl GroundTruth for InMemoryGroundTruth {
    fn get(&self, scenario_id: &str) -> Option<&ScenarioSpec> {
        self.scenarios.get(scenario_id)
    }
}
