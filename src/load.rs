//! Reading the ground-truth and response JSON files.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use lumen_score::{InMemoryGroundTruth, ResponseRecord};

use crate::convert;

/// Hourly capacity: one value for every hour, or 24 values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CapacityJson {
    Uniform(f64),
    Hourly(Vec<f64>),
}

/// One scenario as stored in the ground-truth file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GroundTruthRecord {
    pub id: String,
    pub daily_target: f64,
    pub prices: Vec<f64>,
    pub capacity: CapacityJson,
    pub optimal: Vec<f64>,
    #[serde(default)]
    pub category: Option<String>,
}

fn read(path: &Path, what: &str) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {what} file: {}", path.display()))
}

/// Loads and validates every scenario in a ground-truth JSON array.
pub fn load_ground_truth(path: &Path) -> Result<InMemoryGroundTruth> {
    let text = read(path, "ground truth")?;
    let records: Vec<GroundTruthRecord> = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse ground truth: {}", path.display()))?;

    let scenarios = records
        .into_iter()
        .map(convert::build_scenario)
        .collect::<Result<Vec<_>>>()?;
    let truth = InMemoryGroundTruth::new(scenarios).context("invalid ground truth")?;
    info!(path = %path.display(), scenarios = truth.len(), "ground truth loaded");
    Ok(truth)
}

/// Loads a JSON array of response records.
pub fn load_responses(path: &Path) -> Result<Vec<ResponseRecord>> {
    let text = read(path, "responses")?;
    let records: Vec<ResponseRecord> = serde_json::from_str(&text)
        .with_context(|| format!("failed to parse responses: {}", path.display()))?;
    info!(path = %path.display(), records = records.len(), "responses loaded");
    Ok(records)
}
