//! Ending outlines: one block per ending with its trigger condition.
//!
//! ```text
//! ### Ending 1: The Hero's Return
//! **Trigger condition**: courage high, wisdom medium
//! **Summary**: The city is saved.
//!
//! 结局二：孤独的守望者
//! 触发条件：勇气较低
//! 结局梗概：主角留在了塔中。
//! ```

use serde::{Deserialize, Serialize};

use crate::field::{field, field_block, lines_with_spans, strip_prefix_ignore_case};
use crate::section::trim_range;

const CONDITION_LABELS: &[&str] = &["trigger condition", "condition", "触发条件", "条件"];
const SUMMARY_LABELS: &[&str] = &["summary", "结局梗概", "梗概", "概述"];
const CJK_NUMERALS: &[char] = &['一', '二', '三', '四', '五', '六', '七', '八', '九', '十'];

/// One planned ending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndingOutline {
    /// Ending title; `Ending N` / `结局N` when the heading has none.
    pub title: String,
    /// Qualitative trigger condition; empty when not given.
    pub condition: String,
    /// Plot summary; empty when not given.
    pub summary: String,
}

/// Parse `Ending 2: Title` or `结局二：标题`; the number may be digits,
/// CJK numerals, or a single letter.
fn parse_ending_heading(line: &str) -> Option<String> {
    let line = line
        .trim()
        .trim_start_matches('#')
        .trim()
        .trim_matches('*')
        .trim();

    let (rest, default_prefix, cjk) = match strip_prefix_ignore_case(line, "ending") {
        Some(rest) => (rest.trim_start(), "Ending ", false),
        None => (line.strip_prefix("结局")?.trim_start(), "结局", true),
    };
    let number_len = rest
        .find(|c: char| !(c.is_ascii_alphanumeric() || CJK_NUMERALS.contains(&c)))
        .unwrap_or(rest.len());
    let (number, after) = rest.split_at(number_len);
    if number.is_empty() || (!cjk && number.chars().count() > 1 && !number.chars().all(|c| c.is_ascii_digit())) {
        return None;
    }

    let after = after.trim_start();
    let title = match after.chars().next() {
        Some(c @ ('-' | '–' | '—' | ':' | '：')) => &after[c.len_utf8()..],
        None => "",
        Some(_) => return None,
    };
    let title = title.trim().trim_matches('*').trim();
    Some(if title.is_empty() {
        format!("{default_prefix}{number}")
    } else {
        title.to_string()
    })
}

/// Every ending block of `text`, in document order.
pub fn parse_endings(text: &str) -> Vec<EndingOutline> {
    let headings: Vec<(std::ops::Range<usize>, String)> = lines_with_spans(text)
        .filter_map(|(span, line)| parse_ending_heading(line).map(|title| (span, title)))
        .collect();

    headings
        .iter()
        .enumerate()
        .map(|(i, (span, title))| {
            let end = headings.get(i + 1).map_or(text.len(), |(next, _)| next.start);
            let body = &text[trim_range(text, span.end..end)];
            EndingOutline {
                title: title.clone(),
                condition: field(body, CONDITION_LABELS).unwrap_or_default().to_string(),
                summary: field_block(body, SUMMARY_LABELS).unwrap_or_default().to_string(),
            }
        })
        .collect()
}
