//! The end-of-game personality report.
//!
//! ```text
//! [Title]: The Reluctant Hero
//! [Review]: You hesitated, then never looked back.
//! [Traits]: brave, stubborn, loyal
//! ```

use serde::{Deserialize, Serialize};

use crate::field::field;

/// Title used when the report names none.
pub const UNKNOWN_TITLE: &str = "unknown title";
/// Review used when the report gives none.
pub const NO_REVIEW: &str = "no review";

const TITLE_LABELS: &[&str] = &["title", "称号"];
const REVIEW_LABELS: &[&str] = &["review", "评价"];
const TRAIT_LABELS: &[&str] = &["traits", "特质"];

/// A player report parsed from generated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Honorific title earned by the player.
    pub title: String,
    /// Short review of the playthrough.
    pub review: String,
    /// Personality traits, in order.
    pub traits: Vec<String>,
}

/// Read the title, review, and trait fields of a report.
pub fn parse_report(text: &str) -> Report {
    Report {
        title: field(text, TITLE_LABELS).unwrap_or(UNKNOWN_TITLE).to_string(),
        review: field(text, REVIEW_LABELS).unwrap_or(NO_REVIEW).to_string(),
        traits: field(text, TRAIT_LABELS)
            .map(|traits| {
                traits
                    .split([',', '，', '、'])
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default(),
    }
}
