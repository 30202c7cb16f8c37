//! Narrative structure planned from a chapter count and story tags.
//!
//! Before an architecture document exists, the chapter count decides how
//! many stages a story gets and where they fall. Tags lean the stages toward
//! a conflict, relationship, or adventure arc:
//!
//! | chapters | stages | arc chosen by tags                       |
//! |----------|--------|------------------------------------------|
//! | 1-3      | 3      | none                                     |
//! | 4-6      | 3 or 4 | conflict, then relationship              |
//! | 7-10     | 5      | relationship, then adventure             |
//! | 11+      | 6      | conflict with relationship, relationship |
//!
//! Short stories may drop stages whose range comes out empty; the stages
//! that remain always tile chapters `1..=total` in order.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

const CONFLICT_TAGS: &[&str] = &[
    "悬疑", "惊悚", "权谋", "争霸", "热血", "灵异", "军事",
    "mystery", "thriller", "intrigue", "conquest", "action", "supernatural", "military",
];
const RELATIONSHIP_TAGS: &[&str] = &[
    "言情", "甜宠", "耽美", "百合", "校园", "青春", "日常",
    "romance", "sweet romance", "boys love", "girls love", "school", "youth", "slice of life",
];
const ADVENTURE_TAGS: &[&str] = &[
    "玄幻", "奇幻", "仙侠", "武侠", "科幻", "冒险", "无限流",
    "fantasy", "xianxia", "wuxia", "science fiction", "sci-fi", "adventure", "infinite flow",
];

/// Story length class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StoryScale {
    /// Up to 5 chapters.
    Short,
    /// 6 to 10 chapters.
    Medium,
    /// More than 10 chapters.
    Long,
}

impl StoryScale {
    /// The scale of a story with `total_chapters` chapters.
    pub fn for_chapters(total_chapters: u32) -> Self {
        match total_chapters {
            0..=5 => StoryScale::Short,
            6..=10 => StoryScale::Medium,
            _ => StoryScale::Long,
        }
    }

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            StoryScale::Short => "short experience",
            StoryScale::Medium => "medium story",
            StoryScale::Long => "long adventure",
        }
    }

    /// What the scale asks of the narrative.
    pub fn description(self) -> &'static str {
        match self {
            StoryScale::Short => "compact narrative, fast emotional buy-in",
            StoryScale::Medium => "balanced development with a complete emotional arc",
            StoryScale::Long => "rich layers and deep character development",
        }
    }
}

/// Which arcs a story's tags lean toward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagProfile {
    /// Mystery, intrigue, military and similar tags.
    pub conflict: bool,
    /// Romance, school, slice of life and similar tags.
    pub relationship: bool,
    /// Fantasy, science fiction, adventure and similar tags.
    pub adventure: bool,
}

impl TagProfile {
    /// Classify `tags`; matching ignores ASCII case and surrounding space.
    pub fn from_tags<S: AsRef<str>>(tags: &[S]) -> Self {
        let has = |known: &[&str]| {
            tags.iter().any(|tag| {
                let tag = tag.as_ref().trim().to_lowercase();
                known.contains(&tag.as_str())
            })
        };
        Self {
            conflict: has(CONFLICT_TAGS),
            relationship: has(RELATIONSHIP_TAGS),
            adventure: has(ADVENTURE_TAGS),
        }
    }
}

/// One planned stage: an inclusive chapter range with its intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedStage {
    /// First chapter, 1-based.
    pub start: u32,
    /// Last chapter, inclusive.
    pub end: u32,
    /// Stage name.
    pub name: String,
    /// What the stage must achieve.
    pub goal: String,
    /// Emotional tone.
    pub tone: String,
}

impl PlannedStage {
    /// Whether `chapter` falls inside the stage.
    pub fn covers(&self, chapter: u32) -> bool {
        self.start <= chapter && chapter <= self.end
    }
}

/// Stages, emotional peaks and chapter clusters for a story length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NarrativeStructure {
    /// Planned number of chapters.
    pub total_chapters: u32,
    /// Length class.
    pub scale: StoryScale,
    /// Stages tiling `1..=total_chapters` in order.
    pub stages: Vec<PlannedStage>,
    /// Chapters carrying an emotional peak, ascending.
    pub emotional_peaks: Vec<u32>,
    /// Inclusive chapter ranges of the emotional clusters, in order.
    pub clusters: Vec<(u32, u32)>,
}

impl NarrativeStructure {
    /// The stage covering `chapter`.
    pub fn stage_for(&self, chapter: u32) -> Option<&PlannedStage> {
        self.stages.iter().find(|stage| stage.covers(chapter))
    }

    /// Render the plan as an architecture outline: a `Stage Plan` section
    /// and a `Chapter Clusters` section, readable by
    /// [`stage_for_chapter`](crate::stage_for_chapter) and
    /// [`cluster_for_chapter`](crate::cluster_for_chapter).
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("## Stage Plan\n");
        for (i, stage) in self.stages.iter().enumerate() {
            let _ = write!(
                out,
                "### Stage {}: {}\n**Chapter range**: {}-{}\n**Core goal**: {}\n**Emotional tone**: {}\n\n",
                i + 1,
                stage.name,
                stage.start,
                stage.end,
                stage.goal,
                stage.tone,
            );
        }
        out.push_str("## Chapter Clusters\n");
        for (i, (start, end)) in self.clusters.iter().enumerate() {
            let _ = write!(out, "### Cluster {}\n**Chapter range**: {start}-{end}\n\n", i + 1);
        }
        out
    }
}

struct Template {
    name: &'static str,
    goal: &'static str,
    tone: &'static str,
}

const fn entry(name: &'static str, goal: &'static str, tone: &'static str) -> Template {
    Template { name, goal, tone }
}

const TINY: &[Template] = &[
    entry("Quick introduction", "establish the world and the core hook at once", "urgent"),
    entry("Core development", "push the plot forward and build attachment fast", "tense"),
    entry("Climax and endings", "release the emotion and unfold the endings", "explosive"),
];

const SHORT_CONFLICT: &[Template] = &[
    entry("Introduction", "establish the world, the protagonist and the core conflict", "establishing"),
    entry("Escalation", "sharpen the conflict and challenge the characters", "tense"),
    entry("Road to resolution", "search for a way out while the characters grow", "developing"),
    entry("Final ending", "resolve the conflict and unfold the endings", "explosive"),
];

const SHORT_RELATIONSHIP: &[Template] = &[
    entry("First meeting", "bring the characters together and start the bond", "light"),
    entry("Growing closer", "deepen the relationship and the feelings", "warm"),
    entry("Relationship crisis", "test the relationship with a challenge", "tense"),
    entry("Relationship ending", "settle where the relationship goes, across endings", "emotional"),
];

const SHORT_GENERAL: &[Template] = &[
    entry("Introduction", "establish the world and the protagonist's situation", "establishing"),
    entry("Exploration", "advance the plot while the protagonist grows", "developing"),
    entry("Climax and endings", "reach the emotional peak and unfold the endings", "explosive"),
];

const MEDIUM_RELATIONSHIP: &[Template] = &[
    entry("Meeting", "bring the characters together and start the bond", "light anticipation"),
    entry("Growing closer", "share experiences and grow together", "warm growth"),
    entry("Challenges", "face inner and outer challenges that shake the bond", "tense conflict"),
    entry("The choice", "face the key choice and deepen the feelings", "deep reflection"),
    entry("Relationship ending", "settle where the relationship goes, across endings", "emotional release"),
];

const MEDIUM_ADVENTURE: &[Template] = &[
    entry("Departure", "accept the mission and prepare for the journey", "eager"),
    entry("Exploration", "face challenges and explore the world", "tense exploration"),
    entry("Turning point", "run into a major crisis or reversal", "tense crisis"),
    entry("Gathering strength", "prepare for the final confrontation", "tense preparation"),
    entry("Final battle", "fight the final confrontation and unfold the endings", "fierce release"),
];

const MEDIUM_GENERAL: &[Template] = &[
    entry("Setup", "establish the world, the characters and the core drive", "anticipation"),
    entry("Development", "advance the main plot while the characters grow", "exploration"),
    entry("Deepening", "deepen the conflict and raise the emotional stakes", "tense deepening"),
    entry("Build-up", "lay the ground for the climax", "tense preparation"),
    entry("Climax and endings", "reach the emotional peak and unfold the endings", "release"),
];

const LONG_MIXED: &[Template] = &[
    entry("World and bonds", "establish the world and the first relationships", "exploration"),
    entry("Conflict and closeness", "let the conflict surface while the bonds grow", "intertwined"),
    entry("Deepening crisis", "raise several crises that test the relationships", "tense and complex"),
    entry("Moment of choice", "make the decisions that settle everyone's fate", "weighty"),
    entry("Final preparation", "prepare for the final confrontation", "tense anticipation"),
    entry("Final ending", "resolve every conflict and unfold the endings", "release"),
];

const LONG_RELATIONSHIP: &[Template] = &[
    entry("First acquaintance", "bring the characters together and form a first bond", "light curiosity"),
    entry("Growing closer", "share experiences while feelings grow", "warm growth"),
    entry("Challenges", "face inner and outer challenges that shake the bond", "tense conflict"),
    entry("Crisis", "a major crisis tests what the relationship is", "deep crisis"),
    entry("The choice", "face the key choice that decides the relationship", "deep reflection"),
    entry("Relationship ending", "settle where the feelings go, across endings", "emotional release"),
];

const LONG_GENERAL: &[Template] = &[
    entry("World introduction", "establish the world and its rules in depth", "exploration"),
    entry("Challenges and growth", "face a series of challenges and grow", "growth"),
    entry("Deepening bonds", "deepen the relationships and add complexity", "complex deepening"),
    entry("Mounting crises", "pile up crises and tension", "tense crisis"),
    entry("Build-up", "prepare fully for the final climax", "tense anticipation"),
    entry("Final ending", "reach the emotional peak and unfold the endings", "release"),
];

/// Raw stage bounds and templates before empty ranges are dropped.
fn layout(total: u32, profile: TagProfile) -> (Vec<(u32, u32)>, &'static [Template]) {
    match total {
        0..=3 => (vec![(1, 1), (2, total.saturating_sub(1)), (total, total)], TINY),
        4..=6 => {
            if profile.conflict {
                let turn = (total / 2).max(2);
                let bounds = vec![(1, 2), (3, turn), (turn + 1, total - 1), (total, total)];
                (bounds, SHORT_CONFLICT)
            } else if profile.relationship {
                let mid = total / 2;
                let bounds = vec![(1, 2), (3, mid), (mid + 1, total - 1), (total, total)];
                (bounds, SHORT_RELATIONSHIP)
            } else {
                (vec![(1, 2), (3, total - 2), (total - 1, total)], SHORT_GENERAL)
            }
        }
        7..=10 => {
            let half = total / 2;
            let three_quarters = total / 4 * 3;
            let bounds = vec![
                (1, 2),
                (3, half),
                (half + 1, three_quarters),
                (three_quarters + 1, total - 2),
                (total - 1, total),
            ];
            let templates = if profile.relationship {
                MEDIUM_RELATIONSHIP
            } else if profile.adventure {
                MEDIUM_ADVENTURE
            } else {
                MEDIUM_GENERAL
            };
            (bounds, templates)
        }
        _ => {
            let intro = (total / 6).max(2);
            let build = intro + total / 4;
            let develop = build + total / 3;
            let crisis = develop + total / 4;
            let bounds = vec![
                (1, intro),
                (intro + 1, build),
                (build + 1, develop),
                (develop + 1, crisis),
                (crisis + 1, total - 2),
                (total - 1, total),
            ];
            let templates = if profile.conflict && profile.relationship {
                LONG_MIXED
            } else if profile.relationship {
                LONG_RELATIONSHIP
            } else {
                LONG_GENERAL
            };
            (bounds, templates)
        }
    }
}

/// Walk the stages from the last one back, clipping each end below the
/// next stage's start and dropping empty ranges. The final stage always
/// keeps the last chapter.
fn tile(bounds: &[(u32, u32)], templates: &[Template]) -> Vec<PlannedStage> {
    let mut stages = Vec::with_capacity(bounds.len());
    let mut next_start: Option<u32> = None;
    for (&(start, end), template) in bounds.iter().zip(templates).rev() {
        let start = start.max(1);
        let end = next_start.map_or(end, |next| end.min(next.saturating_sub(1)));
        if start > end {
            continue;
        }
        stages.push(PlannedStage {
            start,
            end,
            name: template.name.to_string(),
            goal: template.goal.to_string(),
            tone: template.tone.to_string(),
        });
        next_start = Some(start);
    }
    stages.reverse();
    stages
}

fn emotional_peaks(total: u32) -> Vec<u32> {
    let mut peaks = match total {
        0 => Vec::new(),
        1..=3 => vec![total.min(2)],
        4..=6 => vec![total / 2, total - 1],
        7..=10 => vec![total / 3, total / 2, total - 1],
        _ => vec![total / 4, total / 2, total - 2, total - 1],
    };
    peaks.dedup();
    peaks
}

fn clusters(total: u32) -> Vec<(u32, u32)> {
    if total == 0 {
        return Vec::new();
    }
    let count = (total / 3).clamp(2, 4).min(total);
    let size = total / count;
    (0..count)
        .map(|i| {
            let end = if i + 1 == count { total } else { (i + 1) * size };
            (i * size + 1, end)
        })
        .collect()
}

/// Plan stages, emotional peaks and clusters for a story of
/// `total_chapters` chapters with the given genre `tags`.
///
/// Zero chapters give an empty plan.
pub fn plan_structure<S: AsRef<str>>(total_chapters: u32, tags: &[S]) -> NarrativeStructure {
    let stages = if total_chapters == 0 {
        Vec::new()
    } else {
        let (bounds, templates) = layout(total_chapters, TagProfile::from_tags(tags));
        tile(&bounds, templates)
    };
    NarrativeStructure {
        total_chapters,
        scale: StoryScale::for_chapters(total_chapters),
        stages,
        emotional_peaks: emotional_peaks(total_chapters),
        clusters: clusters(total_chapters),
    }
}
