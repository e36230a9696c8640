//! Locating the allocation field in a decoded object and resolving it to a
//! vector.

use serde_json::{Map, Value};

use crate::allocation::{AllocationVector, HOURS};
use crate::result::FailureKind;

/// Keys tried first, in order.
const ALLOCATION_KEYS: [&str; 5] = [
    "allocation_PPFD_per_hour",
    "allocation PPFD_per_hour",
    "allocation",
    "hourly_allocation",
    "allocations",
];

/// The two accepted layouts of an allocation field.
#[derive(Debug)]
enum RawAllocation<'a> {
    /// `[v0, v1, ..., v23]`
    Hourly(&'a [Value]),
    /// `{"hour_0": v0, "hour_5": v5, ...}`
    Keyed(&'a Map<String, Value>),
}

/// A resolved allocation and whether any hour had to be defaulted to zero.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Extracted {
    pub vector: AllocationVector,
    pub defaulted_hours: usize,
}

/// Finds and resolves the allocation field of `object`.
///
/// # Errors
///
/// [`FailureKind::MissingAllocationField`] if no field is found,
/// [`FailureKind::MalformedAllocation`] if it cannot become a valid vector.
pub(crate) fn extract(object: &Map<String, Value>) -> Result<Extracted, FailureKind> {
    let value = find_allocation(object).ok_or(FailureKind::MissingAllocationField)?;
    let raw = match value {
        Value::Array(items) => RawAllocation::Hourly(items),
        Value::Object(map) => RawAllocation::Keyed(map),
        _ => return Err(FailureKind::MalformedAllocation),
    };
    resolve(&raw).ok_or(FailureKind::MalformedAllocation)
}

/// Top level first, then one level of nesting.
fn find_allocation(object: &Map<String, Value>) -> Option<&Value> {
    find_in(object).or_else(|| {
        object
            .values()
            .filter_map(Value::as_object)
            .find_map(find_in)
    })
}

fn find_in(object: &Map<String, Value>) -> Option<&Value> {
    ALLOCATION_KEYS
        .iter()
        .find_map(|key| object.get(*key))
        .or_else(|| {
            object
                .iter()
                .find(|(key, _)| key.to_lowercase().contains("allocation"))
                .map(|(_, value)| value)
        })
}

fn resolve(raw: &RawAllocation<'_>) -> Option<Extracted> {
    match raw {
        RawAllocation::Hourly(items) => {
            if items.len() != HOURS {
                return None;
            }
            let values = items.iter().map(numeric).collect::<Option<Vec<f64>>>()?;
            Some(Extracted {
                vector: AllocationVector::new(values).ok()?,
                defaulted_hours: 0,
            })
        }
        RawAllocation::Keyed(map) => {
            let mut slots: [Option<f64>; HOURS] = [None; HOURS];
            let mut recognised = false;
            for (key, value) in map.iter() {
                let Some(hour) = hour_index(key) else {
                    continue;
                };
                if slots[hour].is_some() {
                    return None;
                }
                slots[hour] = Some(numeric(value)?);
                recognised = true;
            }
            if !recognised {
                return None;
            }
            let defaulted_hours = slots.iter().filter(|s| s.is_none()).count();
            let values = slots.iter().map(|s| s.unwrap_or(0.0)).collect();
            Some(Extracted {
                vector: AllocationVector::new(values).ok()?,
                defaulted_hours,
            })
        }
    }
}

/// JSON number or numeric string.
fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Parses `hour_N`, `hourN`, `hN` or `N` (case-insensitive) with N in 0..=23.
fn hour_index(key: &str) -> Option<usize> {
    let key = key.trim().to_ascii_lowercase();
    let digits = key
        .strip_prefix("hour_")
        .or_else(|| key.strip_prefix("hour"))
        .or_else(|| key.strip_prefix('h'))
        .unwrap_or(key.as_str());
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<usize>().ok().filter(|&h| h < HOURS)
}
