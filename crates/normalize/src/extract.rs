//! Text-level extraction: fenced code blocks and outer-brace substrings.

const FENCE: &str = "```";

/// Length of the language tag right after a fence opener (` ```json `).
fn tag_len(after: &str) -> usize {
    after
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+')))
        .unwrap_or(after.len())
}

/// Content of the fenced block that opens `text`, trimmed.
///
/// Returns `None` unless `text` starts with a fence. A missing closer means
/// the block runs to the end of the text.
pub(crate) fn unwrap_markdown(text: &str) -> Option<&str> {
    let after = text.trim_start().strip_prefix(FENCE)?;
    let body = &after[tag_len(after)..];
    let body = match body.find(FENCE) {
        Some(close) => &body[..close],
        None => body,
    };
    Some(body.trim())
}

/// Trimmed bodies of every closed fenced block in `text`, in order.
pub(crate) fn fenced_blocks(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let open = rest.find(FENCE)?;
        let after = &rest[open + FENCE.len()..];
        let body = &after[tag_len(after)..];
        let close = body.find(FENCE)?;
        rest = &body[close + FENCE.len()..];
        Some(body[..close].trim())
    })
}

/// Substring from the first `{` through the last `}`, inclusive.
pub(crate) fn outer_braces(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}
