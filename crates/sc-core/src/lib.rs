//! Core types for Storycraft: parsed chapters, attribute ranges, and ending conditions.
//!
//! This crate defines the structured document that the text parser produces
//! and the balance calculator consumes. It is independent of the parser:
//! you can construct a [`ParsedChapter`] programmatically or deserialize one
//! from the JSON chapter schema.

/// Planning-document sections and stage sub-fields.
pub mod architecture;
/// Attribute values and the `[min, max]` ranges derived from choices.
pub mod attribute;
/// Chapters, scenes, dialogues, and player choices.
pub mod chapter;
/// Numeric ending predicates.
pub mod condition;
/// Error types used throughout the crate.
pub mod error;
/// Line helpers shared by the parsers.
pub mod text;

/// Re-export planning-document types.
pub use architecture::{ArchitectureSection, StageFields};
/// Re-export attribute types.
pub use attribute::{AttributeMap, AttributeRange, RangeMap};
/// Re-export chapter types.
pub use chapter::{Choice, ChoiceGroup, Dialogue, ParsedChapter, Scene};
/// Re-export condition types.
pub use condition::{Comparison, EndingCondition, Threshold};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
