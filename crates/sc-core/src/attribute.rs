use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Attribute name → current integer value.
pub type AttributeMap = BTreeMap<String, i64>;

/// Attribute name → attainable `[min, max]` range.
pub type RangeMap = BTreeMap<String, AttributeRange>;

/// The attainable `[min, max]` value of one attribute.
///
/// Serialized as a two-element array, e.g. `[8, 15]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[i64; 2]", into = "[i64; 2]")]
pub struct AttributeRange {
    /// Worst-case cumulative value.
    pub min: i64,
    /// Best-case cumulative value.
    pub max: i64,
}

impl AttributeRange {
    /// A degenerate range holding a single value.
    pub fn point(value: i64) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Build a range, rejecting `min > max`.
    pub fn new(name: &str, min: i64, max: i64) -> CoreResult<Self> {
        if min > max {
            return Err(CoreError::InvalidRange {
                name: name.to_string(),
                min,
                max,
            });
        }
        Ok(Self { min, max })
    }

    /// `max - min`, saturating at `i64::MAX`.
    pub fn span(&self) -> i64 {
        self.max.saturating_sub(self.min)
    }

    /// Widen the range by the smallest and largest delta of one decision point.
    ///
    /// Bounds saturate at the `i64` limits.
    pub fn extend(&mut self, min_delta: i64, max_delta: i64) {
        self.min = self.min.saturating_add(min_delta);
        self.max = self.max.saturating_add(max_delta);
    }

    /// Whether `value` lies within `[min, max]`.
    pub fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Position of `value` in the range as a 0–100 score, clamped.
    ///
    /// A degenerate range scores 100 for any value at or above it and 0 below.
    pub fn score(&self, value: i64) -> u32 {
        let span = self.span();
        if span <= 0 {
            return if value >= self.max { 100 } else { 0 };
        }
        let clamped = value.clamp(self.min, self.max);
        let offset = i128::from(clamped) - i128::from(self.min);
        let width = i128::from(self.max) - i128::from(self.min);
        (offset * 100 / width) as u32
    }
}

impl From<[i64; 2]> for AttributeRange {
    fn from([min, max]: [i64; 2]) -> Self {
        Self { min, max }
    }
}

impl From<AttributeRange> for [i64; 2] {
    fn from(range: AttributeRange) -> Self {
        [range.min, range.max]
    }
}

impl fmt::Display for AttributeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}
