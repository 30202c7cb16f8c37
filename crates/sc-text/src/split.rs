//! Percentage-based scene segmentation that never cuts through a choice group.

use std::ops::Range;

use sc_core::ChoiceGroup;

use crate::choice::ChoiceGroupScanner;
use crate::config::ParseConfig;

/// Splits a chapter body into scene segments at approximate percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafeRangeSplitter {
    window: usize,
}

impl Default for SafeRangeSplitter {
    fn default() -> Self {
        Self::new(&ParseConfig::default())
    }
}

/// The body text as `char`s, with the byte offset of every `char` boundary.
struct CharIndex<'a> {
    chars: Vec<char>,
    offsets: Vec<usize>,
    groups: &'a [ChoiceGroup],
}

impl CharIndex<'_> {
    fn total(&self) -> usize {
        self.chars.len()
    }

    fn byte(&self, char_pos: usize) -> usize {
        self.offsets[char_pos]
    }

    /// Convert a byte offset on a `char` boundary back to a `char` position.
    fn char_pos(&self, byte: usize) -> usize {
        self.offsets.partition_point(|&b| b < byte)
    }

    fn inside_group(&self, char_pos: usize) -> Option<&ChoiceGroup> {
        let byte = self.byte(char_pos);
        self.groups.iter().find(|g| g.strictly_contains(byte))
    }

    fn is_safe(&self, char_pos: usize) -> bool {
        self.inside_group(char_pos).is_none()
    }

    /// Whether a sentence may end right after the `char` at `pos`.
    ///
    /// Agrees with the sentence splitter: a `.` ends a sentence unless a
    /// letter or digit follows it, so `"Go."` ends at the period.
    fn is_terminal(&self, pos: usize) -> bool {
        match self.chars[pos] {
            '。' | '！' | '？' | '；' | '!' | '?' | '…' => true,
            '.' => self
                .chars
                .get(pos + 1)
                .is_none_or(|c| !c.is_ascii_alphanumeric()),
            _ => false,
        }
    }

    /// Cut position after a terminal at `pos`, with the rest of a terminal
    /// run and any closing quotes absorbed.
    fn cut_after_terminal(&self, pos: usize) -> usize {
        let mut cut = pos + 1;
        while cut < self.total() && (is_closer(self.chars[cut]) || self.is_terminal(cut)) {
            cut += 1;
        }
        cut
    }
}

fn is_closer(c: char) -> bool {
    matches!(
        c,
        '"' | '\'' | '”' | '’' | '」' | '』' | '）' | ')' | ']' | '】'
    )
}

impl SafeRangeSplitter {
    /// Build a splitter from the parse configuration.
    pub fn new(config: &ParseConfig) -> Self {
        Self {
            window: config.split_window,
        }
    }

    /// Split `body` at `percentages`, avoiding the interior of `groups`.
    ///
    /// Returns one byte range per percentage for a non-empty body; the ranges
    /// tile the body and the last one always ends at `body.len()`. An empty
    /// body yields no ranges, an empty percentage list one range.
    pub fn split(
        &self,
        body: &str,
        percentages: &[u32],
        groups: &[ChoiceGroup],
    ) -> Vec<Range<usize>> {
        if body.is_empty() {
            return Vec::new();
        }
        if percentages.is_empty() {
            return vec![0..body.len()];
        }

        let index = CharIndex {
            chars: body.chars().collect(),
            offsets: body
                .char_indices()
                .map(|(i, _)| i)
                .chain(std::iter::once(body.len()))
                .collect(),
            groups,
        };
        let total = index.total();

        let mut cuts = Vec::with_capacity(percentages.len());
        let mut prev = 0;
        for &pct in percentages {
            let cut = if pct >= 100 {
                total
            } else {
                let approx = (total as u64 * u64::from(pct) / 100) as usize;
                self.resolve(&index, approx.clamp(prev, total), prev)
            };
            assert!(cut >= prev, "scene cut moved backwards: {cut} < {prev}");
            cuts.push(cut);
            prev = cut;
        }
        if let Some(last) = cuts.last_mut() {
            *last = total;
        }

        let mut segments = Vec::with_capacity(cuts.len());
        let mut start = 0;
        for cut in cuts {
            let end = index.byte(cut);
            segments.push(start..end);
            start = end;
        }
        assert_eq!(
            segments.len(),
            percentages.len(),
            "one segment per percentage"
        );
        segments
    }

    /// Pick a safe cut near `approx`, never before `prev`.
    fn resolve(&self, index: &CharIndex<'_>, approx: usize, prev: usize) -> usize {
        if let Some(group) = index.inside_group(approx) {
            return index.char_pos(group.span.end).max(prev);
        }

        let total = index.total();
        let lo = approx.saturating_sub(self.window).max(prev);
        let hi = (approx + self.window).min(total);

        // Paragraph break fully before approx; cut after it.
        let paragraph = (lo..approx.saturating_sub(1))
            .rev()
            .filter(|&k| index.chars[k] == '\n' && index.chars[k + 1] == '\n')
            .map(|k| k + 2)
            .find(|&cut| cut <= approx && index.is_safe(cut));
        if let Some(cut) = paragraph {
            return cut;
        }

        let preceding = (lo..approx)
            .rev()
            .filter(|&k| index.is_terminal(k))
            .map(|k| index.cut_after_terminal(k))
            .find(|&cut| index.is_safe(cut));
        if let Some(cut) = preceding {
            return cut;
        }

        let following = (approx..hi)
            .filter(|&k| index.is_terminal(k))
            .map(|k| index.cut_after_terminal(k))
            .find(|&cut| index.is_safe(cut));
        if let Some(cut) = following {
            return cut;
        }

        approx
    }
}

/// Split `body` at `percentages` with the default window, scanning the body
/// for choice groups first. The segments concatenate back to `body`.
pub fn split_by_ranges<'a>(body: &'a str, percentages: &[u32]) -> Vec<&'a str> {
    let groups = ChoiceGroupScanner::default().scan(body);
    SafeRangeSplitter::default()
        .split(body, percentages, &groups)
        .into_iter()
        .map(|range| &body[range])
        .collect()
}
