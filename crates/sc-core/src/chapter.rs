use std::collections::BTreeMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::CoreResult;

/// A single player option inside a choice group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    /// 1-based position of this choice within its group.
    pub choice_id: u32,
    /// The option label as written in the source (`A`, `B`, `1`, ...).
    #[serde(default)]
    pub label: String,
    /// The text shown to the player.
    pub text: String,
    /// Signed attribute changes applied when this choice is taken.
    #[serde(default)]
    pub attributes_delta: BTreeMap<String, i64>,
    /// Status changes applied when this choice is taken. The parser never fills
    /// this in; it is carried through for callers that attach statuses later.
    #[serde(default)]
    pub statuses_delta: BTreeMap<String, serde_json::Value>,
    /// Reaction narration shown right after the choice is taken.
    #[serde(default)]
    pub subsequent_dialogues: Vec<String>,
}

impl Choice {
    /// Create a choice with no effects and no reaction.
    pub fn new(choice_id: u32, label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            choice_id,
            label: label.into(),
            text: text.into(),
            attributes_delta: BTreeMap::new(),
            statuses_delta: BTreeMap::new(),
            subsequent_dialogues: Vec::new(),
        }
    }

    /// Add an attribute delta.
    pub fn with_delta(mut self, attribute: impl Into<String>, delta: i64) -> Self {
        self.attributes_delta.insert(attribute.into(), delta);
        self
    }

    /// Add a reaction chunk.
    pub fn with_reaction(mut self, text: impl Into<String>) -> Self {
        self.subsequent_dialogues.push(text.into());
        self
    }

    /// The delta this choice applies to `attribute`, or 0 if it does not mention it.
    pub fn delta(&self, attribute: &str) -> i64 {
        self.attributes_delta.get(attribute).copied().unwrap_or(0)
    }
}

/// A cluster of mutually exclusive choices recognised in a block of text.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceGroup {
    /// Byte range `[start, end)` of the group in the scanned text.
    pub span: Range<usize>,
    /// The choices in source order.
    pub choices: Vec<Choice>,
}

impl ChoiceGroup {
    /// Returns `true` if `offset` lies strictly inside the group span.
    pub fn strictly_contains(&self, offset: usize) -> bool {
        self.span.start < offset && offset < self.span.end
    }
}

/// One narration unit, optionally paired with the choices that follow it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dialogue {
    /// Narration text. Empty only when a choice group has no preceding narration.
    pub narration: String,
    /// The attached choices, or `None` for narration-only dialogue.
    pub player_choices: Option<Vec<Choice>>,
}

impl Dialogue {
    /// Create a narration-only dialogue.
    pub fn narration(text: impl Into<String>) -> Self {
        Self {
            narration: text.into(),
            player_choices: None,
        }
    }

    /// Create a dialogue carrying a choice group.
    pub fn with_choices(text: impl Into<String>, choices: Vec<Choice>) -> Self {
        Self {
            narration: text.into(),
            player_choices: Some(choices),
        }
    }

    /// The attached choices, if any.
    pub fn choices(&self) -> Option<&[Choice]> {
        self.player_choices.as_deref()
    }
}

/// A contiguous slice of a chapter, bounded by a percentage cut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    /// 1-based scene number.
    pub id: u32,
    /// The dialogues of this scene in reading order.
    pub dialogues: Vec<Dialogue>,
    /// Byte range of the scene inside the chapter body. Not serialized.
    #[serde(skip)]
    pub span: Range<usize>,
}

/// A fully structured chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedChapter {
    /// Chapter number from the header line (0 if the header was missing).
    pub chapter_index: u32,
    /// Chapter title from the header line.
    pub title: String,
    /// Scenes numbered `1..=N`.
    pub scenes: Vec<Scene>,
}

impl ParsedChapter {
    /// Deserialize a chapter from the JSON chapter schema.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the chapter to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Iterate over every dialogue of every scene in order.
    pub fn dialogues(&self) -> impl Iterator<Item = &Dialogue> {
        self.scenes.iter().flat_map(|s| s.dialogues.iter())
    }

    /// Iterate over every decision point (the choices of each dialogue that has them).
    pub fn decision_points(&self) -> impl Iterator<Item = &[Choice]> {
        self.dialogues().filter_map(Dialogue::choices)
    }

    /// Total number of choices across all decision points.
    pub fn choice_count(&self) -> usize {
        self.decision_points().map(<[Choice]>::len).sum()
    }
}
