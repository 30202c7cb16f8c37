//! Headings and named sections of a planning document.
//!
//! Two heading styles are recognized: markdown `#`…`######` (the level is
//! the number of hashes) and enumerated CJK headings such as `一、核心设定`
//! (always level 1).

use std::ops::Range;

use sc_core::ArchitectureSection;

use crate::field::lines_with_spans;

const CJK_NUMERALS: &[char] = &[
    '一', '二', '三', '四', '五', '六', '七', '八', '九', '十', '百', '零', '〇',
];

/// A heading line of a planning document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Nesting level; 1 is outermost.
    pub level: usize,
    /// Heading text without markers or emphasis.
    pub title: String,
    /// Byte span of the heading line.
    pub line: Range<usize>,
}

impl Heading {
    /// Whether the title contains `name`, ignoring case.
    pub fn matches(&self, name: &str) -> bool {
        self.title.to_lowercase().contains(&name.to_lowercase())
    }
}

fn parse_heading(line: &str) -> Option<(usize, &str)> {
    let trimmed = line.trim();
    let hashes = trimmed.len() - trimmed.trim_start_matches('#').len();
    if hashes > 0 {
        let rest = &trimmed[hashes..];
        if hashes > 6 || !(rest.is_empty() || rest.starts_with(char::is_whitespace)) {
            return None;
        }
        return Some((hashes, rest.trim().trim_matches('*').trim()));
    }

    let numeral = trimmed.trim_start_matches(CJK_NUMERALS);
    if numeral.len() == trimmed.len() {
        return None;
    }
    let title = numeral.strip_prefix('、')?;
    Some((1, title.trim().trim_matches('*').trim()))
}

/// Every heading of `doc`, in document order.
pub fn headings(doc: &str) -> Vec<Heading> {
    lines_with_spans(doc)
        .filter_map(|(line, text)| {
            parse_heading(text).map(|(level, title)| Heading {
                level,
                title: title.to_string(),
                line,
            })
        })
        .collect()
}

/// Trim `range` of `doc` to its non-whitespace content.
pub(crate) fn trim_range(doc: &str, range: Range<usize>) -> Range<usize> {
    let text = &doc[range.clone()];
    let start = range.start + (text.len() - text.trim_start().len());
    start..start + text.trim().len()
}

/// Byte range of the body under `headings[index]`: from the end of its line
/// to the next heading at the same or a higher level, or `limit`. Trimmed.
pub(crate) fn body_under(doc: &str, headings: &[Heading], index: usize, limit: usize) -> Range<usize> {
    let heading = &headings[index];
    let end = headings[index + 1..]
        .iter()
        .find(|next| next.level <= heading.level)
        .map_or(limit, |next| next.line.start.min(limit));
    trim_range(doc, heading.line.end.min(end)..end)
}

/// The first heading containing `name` and the byte range of its body.
pub fn find_section(doc: &str, name: &str) -> Option<(Heading, Range<usize>)> {
    let all = headings(doc);
    let index = all.iter().position(|h| h.matches(name))?;
    let body = body_under(doc, &all, index, doc.len());
    Some((all[index].clone(), body))
}

/// The first section whose heading contains any of `names`, tried in order.
pub(crate) fn find_any_section(doc: &str, names: &[&str]) -> Option<(Heading, Range<usize>)> {
    names.iter().find_map(|name| find_section(doc, name))
}

/// Text under the first heading containing `name`, up to the next heading
/// at the same or a higher level, trimmed. Empty when no heading matches.
pub fn extract_section(doc: &str, name: &str) -> String {
    find_section(doc, name).map_or_else(String::new, |(_, body)| doc[body].to_string())
}

/// The section under the first heading containing `name`.
///
/// A missing section keeps the requested name and has empty text.
pub fn section(doc: &str, name: &str) -> ArchitectureSection {
    match find_section(doc, name) {
        Some((heading, body)) => ArchitectureSection {
            name: heading.title,
            text: doc[body].to_string(),
            fields: None,
        },
        None => ArchitectureSection {
            name: name.to_string(),
            text: String::new(),
            fields: None,
        },
    }
}

/// The direct child headings inside `range` of `doc`, each with its body.
///
/// Children are the headings of the smallest level found in the range.
pub(crate) fn children(doc: &str, range: Range<usize>) -> Vec<(Heading, Range<usize>)> {
    let inside: Vec<Heading> = headings(doc)
        .into_iter()
        .filter(|h| h.line.start >= range.start && h.line.end <= range.end)
        .collect();
    let Some(level) = inside.iter().map(|h| h.level).min() else {
        return Vec::new();
    };
    (0..inside.len())
        .filter(|&i| inside[i].level == level)
        .map(|i| (inside[i].clone(), body_under(doc, &inside, i, range.end)))
        .collect()
}
