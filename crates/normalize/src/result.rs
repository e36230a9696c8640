//! Normalisation outcome types.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::allocation::AllocationVector;

/// A deterministic textual or structural fix applied on the way to a vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepairKind {
    /// A fenced code block was stripped.
    MarkdownUnwrap,
    /// Prose before the first `{` or after the last `}` was discarded.
    SubstringExtraction,
    /// Missing `}` / `]` were appended.
    BraceCompletion,
    /// An unterminated string was closed.
    QuoteCompletion,
    /// A comma directly before `}` or `]` was removed.
    TrailingCommaRemoved,
    /// One or more hours were absent from an hour-keyed mapping and set to 0.
    MissingHourDefaulted,
}

impl RepairKind {
    /// Stable snake_case tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            RepairKind::MarkdownUnwrap => "markdown_unwrap",
            RepairKind::SubstringExtraction => "substring_extraction",
            RepairKind::BraceCompletion => "brace_completion",
            RepairKind::QuoteCompletion => "quote_completion",
            RepairKind::TrailingCommaRemoved => "trailing_comma_removed",
            RepairKind::MissingHourDefaulted => "missing_hour_defaulted",
        }
    }
}

impl fmt::Display for RepairKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a response produced no allocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// No JSON object could be decoded, even after repair.
    ParseError,
    /// A JSON object decoded but had no recognisable allocation field.
    MissingAllocationField,
    /// The allocation field had the wrong shape, length or values.
    MalformedAllocation,
    /// The response was empty or whitespace only.
    EmptyResponse,
}

impl FailureKind {
    /// Stable snake_case tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::ParseError => "parse_error",
            FailureKind::MissingAllocationField => "missing_allocation_field",
            FailureKind::MalformedAllocation => "malformed_allocation",
            FailureKind::EmptyResponse => "empty_response",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of [`normalize`](crate::normalize).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum NormalizationResult {
    /// A valid vector, with the repairs that were needed to reach it.
    Success {
        vector: AllocationVector,
        repairs: BTreeSet<RepairKind>,
    },
    /// No vector; `raw_text` is the untouched input.
    Failure { kind: FailureKind, raw_text: String },
}

impl NormalizationResult {
    pub(crate) fn failure(kind: FailureKind, raw: &str) -> Self {
        NormalizationResult::Failure {
            kind,
            raw_text: raw.to_string(),
        }
    }

    /// Returns `true` for [`NormalizationResult::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, NormalizationResult::Success { .. })
    }

    /// The vector, if normalisation succeeded.
    pub fn vector(&self) -> Option<&AllocationVector> {
        match self {
            NormalizationResult::Success { vector, .. } => Some(vector),
            NormalizationResult::Failure { .. } => None,
        }
    }

    /// Repairs applied. Empty for failures and clean successes.
    pub fn repairs(&self) -> BTreeSet<RepairKind> {
        match self {
            NormalizationResult::Success { repairs, .. } => repairs.clone(),
            NormalizationResult::Failure { .. } => BTreeSet::new(),
        }
    }

    /// The failure kind, if normalisation failed.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            NormalizationResult::Success { .. } => None,
            NormalizationResult::Failure { kind, .. } => Some(*kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_match_serde() {
        for kind in [
            RepairKind::MarkdownUnwrap,
            RepairKind::SubstringExtraction,
            RepairKind::BraceCompletion,
            RepairKind::QuoteCompletion,
            RepairKind::TrailingCommaRemoved,
            RepairKind::MissingHourDefaulted,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
        for kind in [
            FailureKind::ParseError,
            FailureKind::MissingAllocationField,
            FailureKind::MalformedAllocation,
            FailureKind::EmptyResponse,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{kind}\""));
        }
    }

    #[test]
    fn test_accessors() {
        let ok = NormalizationResult::Success {
            vector: AllocationVector::zeros(),
            repairs: BTreeSet::from([RepairKind::BraceCompletion]),
        };
        assert!(ok.is_success());
        assert!(ok.vector().is_some());
        assert!(ok.repairs().contains(&RepairKind::BraceCompletion));
        assert_eq!(ok.failure_kind(), None);

        let bad = NormalizationResult::failure(FailureKind::ParseError, "nope");
        assert!(!bad.is_success());
        assert!(bad.vector().is_none());
        assert!(bad.repairs().is_empty());
        assert_eq!(bad.failure_kind(), Some(FailureKind::ParseError));
    }

    #[test]
    fn test_failure_serialises_tagged() {
        let bad = NormalizationResult::failure(FailureKind::EmptyResponse, "  ");
        let json = serde_json::to_value(&bad).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["kind"], "empty_response");
        assert_eq!(json["raw_text"], "  ");
    }
}
