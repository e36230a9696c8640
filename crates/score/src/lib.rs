//! Scoring of normalised responses against ground truth, and per-model
//! aggregation.
//!
//! ```text
//! ResponseRecord ──score_record()──┐
//!                                  ├─ normalize_value()   (lumen-normalize)
//!                                  └─ score()  -> Result<ScenarioResult>
//! [ScenarioResult] ──aggregate()──> ModelSummary
//! ```
//!
//! Unscoreable responses are values ([`ScenarioResult::Unscoreable`]), never
//! errors. Errors are reserved for caller contract violations such as an
//! invalid [`ScenarioSpec`] or an unknown scenario id.

mod aggregate;
mod config;
mod error;
mod record;
mod scenario;
mod scoring;
mod summary;

pub use aggregate::aggregate;
pub use config::{DEFAULT_PENALTY, DEFAULT_TOLERANCE, ScoreConfig};
pub use error::{AggregateError, ScoreError};
pub use record::{ResponseRecord, score_record};
pub use scenario::{GroundTruth, InMemoryGroundTruth, ScenarioSpec};
pub use scoring::{
    Comparison, ScenarioRef, ScenarioResult, ScenarioScore, Unscoreable, UnscoreableReason,
    compare, score, unscoreable,
};
pub use summary::{CategorySummary, Grade, IntervalPct, ModelInfo, ModelSummary};
