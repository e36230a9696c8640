//! Structural repair of truncated or slightly invalid JSON objects.

use std::collections::BTreeSet;

use serde_json::{Map, Value};
use tracing::trace;

use crate::result::RepairKind;

/// Text produced by [`complete`] and what it had to change.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Completion {
    pub text: String,
    /// Text before the first `{` or after its matching close was dropped.
    pub trimmed: bool,
    pub closed_quote: bool,
    pub closed_brackets: bool,
}

/// Takes the object starting at the first `{` and closes whatever is still
/// open at the end of the text: first an unterminated string, then the open
/// `[` / `{` in reverse order.
///
/// If the object closes before the text ends, the remainder is dropped and
/// nothing is appended. Returns `None` if the text has no `{`.
pub(crate) fn complete(text: &str) -> Option<Completion> {
    let start = text.find('{')?;
    let body = &text[start..];

    let mut closers: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    let mut end = None;

    for (i, c) in body.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => closers.push('}'),
            '[' => closers.push(']'),
            '}' | ']' => {
                closers.pop();
                if closers.is_empty() {
                    end = Some(i + 1);
                    break;
                }
            }
            _ => {}
        }
    }

    if let Some(end) = end {
        return Some(Completion {
            text: body[..end].to_string(),
            trimmed: start > 0 || !body[end..].trim().is_empty(),
            closed_quote: false,
            closed_brackets: false,
        });
    }

    let mut repaired = body.to_string();
    let closed_quote = in_string;
    if in_string {
        // A dangling backslash would escape the appended quote.
        if escaped {
            repaired.pop();
        }
        repaired.push('"');
    }
    let closed_brackets = !closers.is_empty();
    repaired.extend(closers.iter().rev());

    Some(Completion {
        text: repaired,
        trimmed: start > 0,
        closed_quote,
        closed_brackets,
    })
}

/// Removes commas that sit directly (modulo whitespace) before `}` or `]`,
/// outside string literals. Returns `None` if there were none.
pub(crate) fn strip_trailing_commas(text: &str) -> Option<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut removed = false;

    for (i, &c) in chars.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
            continue;
        }
        if c == '"' {
            in_string = true;
        } else if c == ',' {
            let next = chars[i + 1..].iter().find(|ch| !ch.is_whitespace());
            if matches!(next, Some('}') | Some(']')) {
                removed = true;
                continue;
            }
        }
        out.push(c);
    }

    removed.then_some(out)
}

/// Replaces numeric literals outside strings that overflow `f64` (such as
/// `1e400`) with `null`. Returns `None` if there were none.
pub(crate) fn null_overflowing_numbers(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut replaced = false;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            out.push(c);
            prev = Some(c);
            continue;
        }
        let starts_number = (c == '-' || c.is_ascii_digit())
            && !prev.is_some_and(|p| p.is_alphanumeric() || p == '_' || p == '.');
        if !starts_number {
            in_string = c == '"';
            out.push(c);
            prev = Some(c);
            continue;
        }

        let mut end = i + c.len_utf8();
        while let Some(&(j, d)) = chars.peek() {
            if !(d.is_ascii_digit() || matches!(d, '.' | 'e' | 'E' | '+' | '-')) {
                break;
            }
            end = j + d.len_utf8();
            chars.next();
        }
        let token = &text[i..end];
        if token.parse::<f64>().is_ok_and(f64::is_infinite) {
            out.push_str("null");
            replaced = true;
        } else {
            out.push_str(token);
        }
        prev = token.chars().last();
    }

    replaced.then_some(out)
}

/// Decodes `text` as a JSON object, or `None`.
pub(crate) fn parse_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Runs completion and trailing-comma cleanup over `text`, adding the repairs
/// that were needed to `repairs` on success.
pub(crate) fn repair(text: &str, repairs: &mut BTreeSet<RepairKind>) -> Option<Map<String, Value>> {
    let completion = complete(text)?;

    let mut applied = BTreeSet::new();
    if completion.trimmed {
        applied.insert(RepairKind::SubstringExtraction);
    }
    if completion.closed_quote {
        applied.insert(RepairKind::QuoteCompletion);
    }
    if completion.closed_brackets {
        applied.insert(RepairKind::BraceCompletion);
    }
    trace!(?applied, "retrying decode after completion");

    if let Some(object) = parse_object(&completion.text) {
        repairs.extend(applied);
        return Some(object);
    }

    let stripped = strip_trailing_commas(&completion.text)?;
    let object = parse_object(&stripped)?;
    applied.insert(RepairKind::TrailingCommaRemoved);
    repairs.extend(applied);
    Some(object)
}
