//! Translating qualitative ending conditions into numeric thresholds.
//!
//! ```text
//! "courage high, wisdom low"  +  {courage: [0, 100], wisdom: [0, 100]}
//!     → {courage: ">=60", wisdom: "<=40"}
//! ```

use serde::{Deserialize, Serialize};

use sc_core::{AttributeRange, EndingCondition, RangeMap, Threshold};

/// A qualitative level word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// `high` / `较高`
    High,
    /// `medium` / `中等`
    Medium,
    /// `low` / `较低`
    Low,
}

/// Level words and the level they stand for. ASCII words match whole-word,
/// case-insensitively.
const LEVEL_WORDS: &[(&str, Level)] = &[
    ("较高", Level::High),
    ("中等", Level::Medium),
    ("较低", Level::Low),
    ("high", Level::High),
    ("medium", Level::Medium),
    ("low", Level::Low),
];

/// Characters that end the attribute phrase before a level word.
const DELIMITERS: &[char] = &[',', '，', ';', '；', '。', '.', '\n', '、', ':', '：', '且'];

/// Markdown noise removed from a phrase before matching.
const MARKUP: &[char] = &['*', '[', ']', '【', '】'];

/// Fractions of an attribute's span that each level maps to.
///
/// `high` and `medium` become `>=` predicates, `low` a `<=` predicate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdPolicy {
    /// Fraction for `high`.
    pub high: f64,
    /// Fraction for `medium`.
    pub medium: f64,
    /// Fraction for `low`.
    pub low: f64,
}

impl Default for ThresholdPolicy {
    fn default() -> Self {
        Self {
            high: 0.60,
            medium: 0.33,
            low: 0.40,
        }
    }
}

impl ThresholdPolicy {
    /// The older 50/30/40 table (high/medium/low).
    pub fn legacy() -> Self {
        Self {
            high: 0.50,
            medium: 0.30,
            low: 0.40,
        }
    }

    /// Set the `high` fraction.
    pub fn with_high(mut self, fraction: f64) -> Self {
        self.high = fraction;
        self
    }

    /// Set the `medium` fraction.
    pub fn with_medium(mut self, fraction: f64) -> Self {
        self.medium = fraction;
        self
    }

    /// Set the `low` fraction.
    pub fn with_low(mut self, fraction: f64) -> Self {
        self.low = fraction;
        self
    }

    /// The predicate `level` stands for within `range`.
    ///
    /// A degenerate range is treated as having span 1. The threshold is
    /// truncated toward zero.
    pub fn threshold(&self, level: Level, range: AttributeRange) -> Threshold {
        let span = range.span().max(1) as f64;
        let at = |fraction: f64| (range.min as f64 + span * fraction) as i64;
        match level {
            Level::High => Threshold::at_least(at(self.high)),
            Level::Medium => Threshold::at_least(at(self.medium)),
            Level::Low => Threshold::at_most(at(self.low)),
        }
    }
}

/// Resolves level phrases in free text against known attribute ranges.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConditionResolver {
    policy: ThresholdPolicy,
}

impl ConditionResolver {
    /// A resolver using `policy`.
    pub fn new(policy: ThresholdPolicy) -> Self {
        Self { policy }
    }

    /// Resolve every level phrase in `text`.
    ///
    /// The phrase before each level word (back to the previous delimiter or
    /// level word) names the attribute: the longest range key it contains
    /// wins, ties going to the first key. Phrases naming no known attribute
    /// are dropped. A later phrase for the same attribute overrides an earlier
    /// one.
    pub fn resolve(&self, text: &str, ranges: &RangeMap) -> EndingCondition {
        let mut condition = EndingCondition::new();
        let mut phrase_start = 0;
        let mut i = 0;

        while let Some(c) = text[i..].chars().next() {
            if let Some((level, len)) = level_at(text, i) {
                if let Some((name, range)) = best_attribute(&text[phrase_start..i], ranges) {
                    condition
                        .thresholds
                        .insert(name.clone(), self.policy.threshold(level, *range));
                }
                i += len;
                phrase_start = i;
            } else if let Some(len) = delimiter_at(text, i) {
                i += len;
                phrase_start = i;
            } else {
                i += c.len_utf8();
            }
        }

        condition
    }
}

/// Resolve `text` against `ranges` with `policy`.
pub fn resolve_conditions(text: &str, ranges: &RangeMap, policy: &ThresholdPolicy) -> EndingCondition {
    ConditionResolver::new(*policy).resolve(text, ranges)
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Whether an ASCII word starting at `start` and ending at `end` stands alone.
fn is_whole_word(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

fn level_at(text: &str, i: usize) -> Option<(Level, usize)> {
    let rest = &text[i..];
    LEVEL_WORDS.iter().find_map(|&(word, level)| {
        let head = rest.get(..word.len())?;
        let matched = if word.is_ascii() {
            head.eq_ignore_ascii_case(word) && is_whole_word(text, i, i + word.len())
        } else {
            head == word
        };
        matched.then_some((level, word.len()))
    })
}

fn delimiter_at(text: &str, i: usize) -> Option<usize> {
    let rest = &text[i..];
    let c = rest.chars().next()?;
    if DELIMITERS.contains(&c) {
        return Some(c.len_utf8());
    }
    let head = rest.get(..3)?;
    (head.eq_ignore_ascii_case("and") && is_whole_word(text, i, i + 3)).then_some(3)
}

fn best_attribute<'a>(phrase: &str, ranges: &'a RangeMap) -> Option<(&'a String, &'a AttributeRange)> {
    let cleaned: String = phrase
        .chars()
        .filter(|c| !MARKUP.contains(c))
        .collect::<String>()
        .to_lowercase();

    let mut best: Option<(&String, &AttributeRange)> = None;
    let mut best_len = 0;
    for (name, range) in ranges {
        let len = name.chars().count();
        if len > best_len && cleaned.contains(&name.to_lowercase()) {
            best = Some((name, range));
            best_len = len;
        }
    }
    best
}
