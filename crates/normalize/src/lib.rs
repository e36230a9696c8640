//! Response normalisation: raw model text to a 24-hour allocation vector.
//!
//! [`normalize`] is total. Every input, however broken, yields a
//! [`NormalizationResult`]; malformed text is data, not an error.
//!
//! # Pipeline
//!
//! ```text
//! normalize()
//!   ├─ empty / whitespace           -> Failure(EmptyResponse)
//!   ├─ strict decode
//!   ├─ leading fence unwrap         (extract.rs)   markdown_unwrap
//!   ├─ any later fenced block       (extract.rs)   markdown_unwrap
//!   ├─ first '{' .. last '}'        (extract.rs)   substring_extraction
//!   ├─ quote + bracket completion   (repair.rs)    quote_completion, brace_completion
//!   ├─ trailing comma cleanup       (repair.rs)    trailing_comma_removed
//!   ├─ out-of-range numbers -> null (repair.rs)    retry of the steps above
//!   └─ field extraction + checks    (field.rs)     missing_hour_defaulted
//! ```
//!
//! Only a JSON *object* counts as a decoded response.
//!
//! # Example
//!
//! ```
//! use lumen_normalize::{RepairKind, normalize};
//!
//! let raw = "```json\n{\"allocation_PPFD_per_hour\": {\"hour_10\": 300, \"hour_11\": 300}}\n```";
//! let result = normalize(raw);
//! let vector = result.vector().unwrap();
//! assert_eq!(vector.total(), 600.0);
//! assert!(result.repairs().contains(&RepairKind::MarkdownUnwrap));
//! assert!(result.repairs().contains(&RepairKind::MissingHourDefaulted));
//! ```

mod allocation;
mod error;
mod extract;
mod field;
mod repair;
mod result;

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use tracing::debug;

pub use allocation::{AllocationVector, CANONICAL_KEY, HOURS};
pub use error::AllocationError;
pub use result::{FailureKind, NormalizationResult, RepairKind};

/// Normalises one raw model response.
///
/// Deterministic for identical input. See the crate docs for the order in
/// which repairs are attempted.
pub fn normalize(raw: &str) -> NormalizationResult {
    let text = raw.trim();
    if text.is_empty() {
        return NormalizationResult::failure(FailureKind::EmptyResponse, raw);
    }

    let mut repairs = BTreeSet::new();
    let Some(object) = decode(text, &mut repairs) else {
        debug!(len = raw.len(), "no JSON object recovered");
        return NormalizationResult::failure(FailureKind::ParseError, raw);
    };

    match field::extract(&object) {
        Ok(extracted) => {
            if extracted.defaulted_hours > 0 {
                repairs.insert(RepairKind::MissingHourDefaulted);
            }
            if !repairs.is_empty() {
                debug!(?repairs, defaulted = extracted.defaulted_hours, "normalised with repairs");
            }
            NormalizationResult::Success {
                vector: extracted.vector,
                repairs,
            }
        }
        Err(kind) => {
            debug!(%kind, "decoded object has no usable allocation");
            NormalizationResult::failure(kind, raw)
        }
    }
}

/// Normalises a response that may already have been decoded upstream.
///
/// Strings are normalised as text, `null` counts as an empty response, and
/// any other value is re-serialised to JSON text first.
pub fn normalize_value(value: &Value) -> NormalizationResult {
    match value {
        Value::Null => normalize(""),
        Value::String(text) => normalize(text),
        other => normalize(&other.to_string()),
    }
}

fn decode(text: &str, repairs: &mut BTreeSet<RepairKind>) -> Option<Map<String, Value>> {
    if let Some(object) = decode_text(text, repairs) {
        return Some(object);
    }
    // Numbers beyond f64 range fail the whole decode. Nulling them lets the
    // object through so the allocation check can classify it.
    let finite = repair::null_overflowing_numbers(text)?;
    debug!("retrying decode with out-of-range numbers nulled");
    decode_text(&finite, repairs)
}

fn decode_text(text: &str, repairs: &mut BTreeSet<RepairKind>) -> Option<Map<String, Value>> {
    if let Some(object) = repair::parse_object(text) {
        return Some(object);
    }

    if let Some(inner) = extract::unwrap_markdown(text)
        && let Some(object) = recover(inner, repairs)
    {
        repairs.insert(RepairKind::MarkdownUnwrap);
        return Some(object);
    }

    if let Some(object) = extract::fenced_blocks(text).find_map(repair::parse_object) {
        repairs.insert(RepairKind::MarkdownUnwrap);
        return Some(object);
    }

    recover(text, repairs)
}

/// Substring extraction, then completion. Records repairs only on success.
fn recover(text: &str, repairs: &mut BTreeSet<RepairKind>) -> Option<Map<String, Value>> {
    if let Some(object) = repair::parse_object(text) {
        return Some(object);
    }

    if let Some(sub) = extract::outer_braces(text)
        && sub.len() < text.len()
        && let Some(object) = repair::parse_object(sub)
    {
        repairs.insert(RepairKind::SubstringExtraction);
        return Some(object);
    }

    repair::repair(text, repairs)
}
