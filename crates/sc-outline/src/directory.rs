//! The chapter directory: one heading per chapter with its outline.
//!
//! ```text
//! ### Chapter 1 - The Gate
//! **Outline**: The hero reaches the gate at dusk.
//!
//! 第2章 - 城门
//! **章节大纲**：主角在黄昏时抵达城门。
//! ```

use std::ops::Range;

use serde::{Deserialize, Serialize};

use sc_core::text::leading_number;

use crate::field::{field_block, field_range, lines_with_spans, strip_prefix_ignore_case};
use crate::section::trim_range;

/// Returned by [`chapter_block`] when the chapter is not in the directory.
pub const CHAPTER_NOT_FOUND: &str = "chapter not found";
/// Outline used when a chapter entry has no outline field.
pub const NO_OUTLINE: &str = "no outline";

const OUTLINE_LABELS: &[&str] = &["chapter outline", "outline", "core plot", "章节大纲", "核心剧情"];

/// One chapter entry of the directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterOutline {
    /// Chapter number.
    pub chapter_index: u32,
    /// Chapter title; `Chapter N` / `第N章` when the heading has none.
    pub title: String,
    /// Outline text, or [`NO_OUTLINE`].
    pub outline: String,
}

/// A chapter heading and the byte range of its whole entry.
struct Entry {
    index: u32,
    title: String,
    heading: Range<usize>,
    block: Range<usize>,
}

/// Parse `Chapter 3 - Title`, `第 3 章：标题`, or `第3章标题`.
///
/// English headings need a separator or nothing after the number, so prose
/// starting with "Chapter 2 ended" is not a heading.
fn parse_chapter_heading(line: &str) -> Option<(u32, String)> {
    let line = line
        .trim()
        .trim_start_matches('#')
        .trim()
        .trim_matches('*')
        .trim();

    let (index, after, default_title) = if let Some(rest) = strip_prefix_ignore_case(line, "chapter") {
        let (index, after) = leading_number(rest.trim_start())?;
        (index, after.trim_start(), format!("Chapter {index}"))
    } else {
        let (index, after) = leading_number(line.strip_prefix('第')?.trim_start())?;
        let after = after.trim_start().strip_prefix('章')?;
        (index, after.trim_start(), format!("第{index}章"))
    };

    let title = match after.chars().next() {
        Some(c @ ('-' | '–' | '—' | ':' | '：')) => &after[c.len_utf8()..],
        Some(_) if default_title.is_ascii() => return None,
        _ => after,
    };
    let title = title.trim().trim_matches('*').trim();
    let title = if title.is_empty() {
        default_title
    } else {
        title.to_string()
    };
    Some((index, title))
}

fn entries(doc: &str) -> Vec<Entry> {
    let headings: Vec<(Range<usize>, u32, String)> = lines_with_spans(doc)
        .filter_map(|(span, line)| parse_chapter_heading(line).map(|(index, title)| (span, index, title)))
        .collect();

    headings
        .iter()
        .enumerate()
        .map(|(i, (span, index, title))| {
            let end = headings.get(i + 1).map_or(doc.len(), |(next, _, _)| next.start);
            Entry {
                index: *index,
                title: title.clone(),
                heading: span.clone(),
                block: span.start..end,
            }
        })
        .collect()
}

fn outline_of(doc: &str, entry: &Entry) -> String {
    field_block(&doc[entry.heading.end..entry.block.end], OUTLINE_LABELS)
        .unwrap_or(NO_OUTLINE)
        .to_string()
}

/// Every chapter entry of `doc`, in document order.
pub fn parse_chapter_directory(doc: &str) -> Vec<ChapterOutline> {
    entries(doc)
        .iter()
        .map(|entry| ChapterOutline {
            chapter_index: entry.index,
            title: entry.title.clone(),
            outline: outline_of(doc, entry),
        })
        .collect()
}

/// The entry for `chapter`, if the directory has one.
pub fn chapter_outline(doc: &str, chapter: u32) -> Option<ChapterOutline> {
    let entry = entries(doc).into_iter().find(|e| e.index == chapter)?;
    Some(ChapterOutline {
        chapter_index: entry.index,
        outline: outline_of(doc, &entry),
        title: entry.title,
    })
}

/// The full text of `chapter`'s entry, heading included, trimmed; or
/// [`CHAPTER_NOT_FOUND`].
pub fn chapter_block(doc: &str, chapter: u32) -> String {
    entries(doc)
        .into_iter()
        .find(|e| e.index == chapter)
        .map_or_else(
            || CHAPTER_NOT_FOUND.to_string(),
            |entry| doc[trim_range(doc, entry.block)].to_string(),
        )
}

/// `doc` with the outline of `chapter` replaced by `outline`.
///
/// Returns `None` when the chapter or its outline field is missing. The rest
/// of the document is left byte-for-byte unchanged.
pub fn replace_outline(doc: &str, chapter: u32, outline: &str) -> Option<String> {
    let entry = entries(doc).into_iter().find(|e| e.index == chapter)?;
    let body_start = entry.heading.end;
    let value = field_range(&doc[body_start..entry.block.end], OUTLINE_LABELS)?;
    let range = body_start + value.start..body_start + value.end;

    let mut updated = String::with_capacity(doc.len() + outline.len());
    updated.push_str(&doc[..range.start]);
    updated.push_str(outline.trim());
    updated.push_str(&doc[range.end..]);
    Some(updated)
}
