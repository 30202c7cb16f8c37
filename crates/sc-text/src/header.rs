//! Chapter header lines (`Chapter 3 - The Gate`, `第3章 - 城门`).

use std::ops::Range;

use sc_core::text::{leading_number, lines_with_spans, strip_prefix_ignore_case};

/// Title used when a chapter has no recognizable header.
pub const UNTITLED: &str = "untitled";

/// Sub-headings dropped after the chapter header, compared case-insensitively.
const STORY_SUBHEADINGS: &[&str] = &["story", "story content", "剧情内容"];

/// Chapter number and title taken from the header line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterHeader {
    /// Chapter number.
    pub index: u32,
    /// Chapter title, trimmed.
    pub title: String,
    /// Byte span of the header line in the raw text.
    pub span: Range<usize>,
}

impl ChapterHeader {
    /// The fallback header: chapter 0, `untitled`.
    pub fn untitled() -> Self {
        Self {
            index: 0,
            title: UNTITLED.to_string(),
            span: 0..0,
        }
    }
}

/// Find the chapter header on the first non-blank line of `raw`.
pub fn find_header(raw: &str) -> Option<ChapterHeader> {
    let (span, line) = lines_with_spans(raw).find(|(_, line)| !line.trim().is_empty())?;
    let (index, title) = parse_header_line(line)?;
    Some(ChapterHeader { index, title, span })
}

/// The chapter header of `raw`, or [`ChapterHeader::untitled`].
pub fn extract_header(raw: &str) -> ChapterHeader {
    find_header(raw).unwrap_or_else(ChapterHeader::untitled)
}

fn parse_header_line(line: &str) -> Option<(u32, String)> {
    let line = line
        .trim()
        .trim_start_matches('#')
        .trim()
        .trim_matches('*')
        .trim();

    let (index, after) = if let Some(rest) = strip_prefix_ignore_case(line, "chapter") {
        leading_number(rest.trim_start())?
    } else {
        let (index, rest) = leading_number(line.strip_prefix('第')?)?;
        (index, rest.strip_prefix('章')?)
    };

    let title_part = after.trim_start();
    let title_part = match title_part.chars().next() {
        Some(c @ ('-' | '–' | '—' | ':' | '：')) => &title_part[c.len_utf8()..],
        Some(_) if title_part.len() == after.len() => return None,
        _ => title_part,
    };
    let title = title_part.trim().trim_matches('*').trim();
    let title = if title.is_empty() { UNTITLED } else { title };
    Some((index, title.to_string()))
}

fn is_story_subheading(line: &str) -> bool {
    let trimmed = line.trim();
    let Some(rest) = trimmed.strip_prefix('#') else {
        return false;
    };
    let name = rest.trim_start_matches('#').trim().trim_matches('*').trim();
    STORY_SUBHEADINGS.contains(&name.to_lowercase().as_str())
}

/// Byte range of the chapter body: the text after the header line and an
/// optional story sub-heading, trimmed.
pub fn body_range(raw: &str) -> Range<usize> {
    let mut start = find_header(raw).map_or(0, |h| h.span.end);

    let subheading = lines_with_spans(&raw[start..])
        .find(|(_, line)| !line.trim().is_empty())
        .filter(|(_, line)| is_story_subheading(line));
    if let Some((span, _)) = subheading {
        start += span.end;
    }

    let rest = &raw[start..];
    let trimmed = rest.trim_start();
    let body_start = start + (rest.len() - trimmed.len());
    body_start..body_start + trimmed.trim_end().len()
}

/// The chapter body with the header and story sub-heading removed.
pub fn strip_headers(raw: &str) -> &str {
    &raw[body_range(raw)]
}
