//! Labeled fields inside a block of text.
//!
//! A field line is a label followed by a colon, with list markers and
//! emphasis tolerated around the label:
//!
//! ```text
//! - **Core goal**: find the key
//! [Title]: The Wanderer
//! 【评价】：勇敢而坚定
//! **情感基调**：紧张
//! ```

use std::ops::Range;

pub(crate) use sc_core::text::{lines_with_spans, strip_prefix_ignore_case};

/// `line` without leading list markers, emphasis, and opening brackets.
pub(crate) fn strip_line_markup(line: &str) -> &str {
    line.trim()
        .trim_start_matches(['-', '+', '>'])
        .trim_start()
        .trim_start_matches(['*', '[', '【', '#'])
        .trim_start()
}

/// Trim whitespace and emphasis markers from both ends of a value.
pub(crate) fn clean_value(value: &str) -> &str {
    value.trim_matches(|c: char| c == '*' || c.is_whitespace())
}

/// Byte offset in `line` where the value of `label` begins.
fn value_start(line: &str, label: &str) -> Option<usize> {
    let rest = strip_prefix_ignore_case(strip_line_markup(line), label)?;
    let rest = rest.trim_start_matches(['*', ']', '】', ' ', '\t']);
    let rest = rest.strip_prefix([':', '：'])?;
    // `rest` is a suffix of the trimmed line
    Some(line.trim_end().len() - rest.len())
}

/// The value of the first of `labels` on `line`, cleaned. May be empty.
pub(crate) fn line_field<'a>(line: &'a str, labels: &[&str]) -> Option<&'a str> {
    labels
        .iter()
        .find_map(|label| value_start(line, label))
        .map(|at| clean_value(&line[at..]))
}

/// The first non-empty single-line value of any of `labels` in `block`.
pub(crate) fn field<'a>(block: &'a str, labels: &[&str]) -> Option<&'a str> {
    block
        .lines()
        .filter_map(|line| line_field(line, labels))
        .find(|value| !value.is_empty())
}

/// Whether `line` opens a new field or heading and so ends a multi-line value.
fn is_field_start(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("**")
        || trimmed.starts_with('[')
        || trimmed.starts_with('【')
        || trimmed.starts_with('#')
}

/// Byte range of a multi-line field value in `block`, trimmed.
///
/// The value starts after the label's colon and runs over the following
/// lines until one opens another field or a heading.
pub(crate) fn field_range(block: &str, labels: &[&str]) -> Option<Range<usize>> {
    let mut lines = lines_with_spans(block);
    let (start, mut end) = lines.by_ref().find_map(|(span, line)| {
        labels
            .iter()
            .find_map(|label| value_start(line, label))
            .map(|at| (span.start + at, span.end))
    })?;
    for (span, line) in lines {
        if is_field_start(line) {
            break;
        }
        end = span.end;
    }

    let value = &block[start..end];
    let start = start + (value.len() - value.trim_start().len());
    Some(start..start + value.trim().len())
}

/// The multi-line value of any of `labels` in `block`, if non-empty.
pub(crate) fn field_block<'a>(block: &'a str, labels: &[&str]) -> Option<&'a str> {
    field_range(block, labels)
        .map(|range| &block[range])
        .filter(|value| !value.is_empty())
}

/// Values of the ASCII digit runs in `text`.
pub(crate) fn numbers(text: &str) -> impl Iterator<Item = u32> + '_ {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
        .filter_map(|run| run.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_with_markup_variants() {
        assert_eq!(field("- **Core goal**: find the key", &["core goal"]), Some("find the key"));
        assert_eq!(field("[Title]: The Wanderer", &["title"]), Some("The Wanderer"));
        assert_eq!(field("【评价】：勇敢而坚定", &["评价"]), Some("勇敢而坚定"));
        assert_eq!(field("**Goal:** reach town", &["goal"]), Some("reach town"));
        assert_eq!(field("Goals are nice", &["goal"]), None);
    }

    #[test]
    fn empty_values_are_skipped() {
        let block = "Tone:\nTone: grim";
        assert_eq!(field(block, &["tone"]), Some("grim"));
    }

    #[test]
    fn multi_line_value_stops_at_next_field() {
        let block = "**Key tasks**:\n- one\n- two\n**Focus**: courage";
        assert_eq!(field_block(block, &["key tasks"]), Some("- one\n- two"));
        let range = field_range(block, &["key tasks"]).unwrap();
        assert_eq!(&block[range], "- one\n- two");
    }

    #[test]
    fn trailing_whitespace_keeps_the_value_whole() {
        assert_eq!(field("Goal: find the key   ", &["goal"]), Some("find the key"));
        assert_eq!(field("核心目标：寻找钥匙 ", &["核心目标"]), Some("寻找钥匙"));
        assert_eq!(field("**情感基调**：紧张\t\r", &["情感基调"]), Some("紧张"));

        let block = "**Key tasks**:  \n- one  \n- two\n**Focus**: courage";
        let range = field_range(block, &["key tasks"]).unwrap();
        assert_eq!(&block[range], "- one  \n- two");
        let block = "关键任务：调查  \n**属性聚焦**：勇气";
        assert_eq!(field_block(block, &["关键任务"]), Some("调查"));
    }

    #[test]
    fn number_runs() {
        assert_eq!(numbers("第1-3章").collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(numbers("none").count(), 0);
    }
}
