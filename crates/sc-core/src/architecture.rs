use serde::{Deserialize, Serialize};

/// A named section pulled out of a planning document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureSection {
    /// The heading text the section was found under.
    pub name: String,
    /// Raw section body, trimmed. Empty when the heading was not found.
    pub text: String,
    /// Stage sub-fields, when the section is a stage block.
    pub fields: Option<StageFields>,
}

impl ArchitectureSection {
    /// Returns `true` if nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Sub-fields of one stage block of the planning document.
///
/// Every field holds either the extracted text or its documented fallback,
/// so callers can feed it into a prompt without further checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageFields {
    /// Stage heading, e.g. `Stage 1: Arrival`.
    pub stage_name: String,
    /// First chapter covered by the stage.
    pub start_chapter: u32,
    /// Last chapter covered by the stage.
    pub end_chapter: u32,
    /// Core narrative goal of the stage.
    pub goal: String,
    /// Emotional tone of the stage.
    pub tone: String,
    /// Key tasks, one entry per task line.
    pub tasks: Vec<String>,
    /// Attributes the stage focuses on.
    pub focus_attributes: String,
    /// Character interactions relevant to the requested chapter.
    pub character_interactions: String,
}

impl StageFields {
    /// Whether `chapter` falls inside the stage's chapter range.
    pub fn covers(&self, chapter: u32) -> bool {
        self.start_chapter <= chapter && chapter <= self.end_chapter
    }
}
