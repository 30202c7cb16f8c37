//! Line helpers shared by the chapter parser and the planning-document readers.

use std::ops::Range;

/// Lines of `text` with their byte spans, line terminators excluded.
pub fn lines_with_spans(text: &str) -> impl Iterator<Item = (Range<usize>, &str)> {
    let mut start = 0;
    text.split_inclusive('\n').map(move |piece| {
        let content = piece.trim_end_matches(['\n', '\r']);
        let span = start..start + content.len();
        start += piece.len();
        (span, content)
    })
}

/// `text` without `prefix`, compared ASCII case-insensitively.
pub fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

/// Split a leading ASCII number off `text`.
///
/// Returns `None` when `text` does not start with a digit or the number
/// does not fit in a `u32`.
pub fn leading_number(text: &str) -> Option<(u32, &str)> {
    let digits = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    let number = text[..digits].parse().ok()?;
    Some((number, &text[digits..]))
}
