//! Game-balance data derived from parsed chapters.
//!
//! [`calculate_ranges`] folds every decision point of a chapter history into
//! attainable `[min, max]` ranges per attribute. [`ConditionResolver`] turns
//! qualitative ending conditions ("courage high") into numeric thresholds
//! against those ranges, and [`ending`] picks the ending a final attribute
//! state reaches.

/// Qualitative condition resolution and threshold policies.
pub mod condition;
/// Ending selection and attribute scores.
pub mod ending;
/// Attribute range calculation.
pub mod range;

pub use condition::{ConditionResolver, Level, ThresholdPolicy, resolve_conditions};
pub use ending::{attribute_scores, select_ending};
pub use range::{AttributeRangeCalculator, calculate_ranges};
