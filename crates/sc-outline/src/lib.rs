//! Planning-document extractors for Storycraft.
//!
//! Generated planning documents (architecture, chapter directory, seeds,
//! reports, scene plans) are loosely formatted markdown in English or
//! Chinese. Every extractor here is total: a missing section, field, or
//! entry yields a documented fallback rather than an error, so callers can
//! feed the result straight into the next prompt.

/// Initial attribute values.
pub mod attributes;
/// Chapter directory entries and outline replacement.
pub mod directory;
/// Ending outlines.
pub mod endings;
mod field;
/// End-of-game reports.
pub mod report;
/// Scene plans: end percentages and image prompts.
pub mod scene_plan;
/// Headings and named sections.
pub mod section;
/// Core story seeds.
pub mod seed;
/// Stage and cluster lookup by chapter.
pub mod stage;
/// Narrative structure planned from a chapter count.
pub mod structure;

pub use attributes::parse_initial_attributes;
pub use directory::{ChapterOutline, chapter_block, chapter_outline, parse_chapter_directory, replace_outline};
pub use endings::{EndingOutline, parse_endings};
pub use report::{Report, parse_report};
pub use scene_plan::{PlannedScene, ScenePlan, parse_scene_plan};
pub use section::{Heading, extract_section, find_section, headings, section};
pub use seed::{CoreSeed, parse_core_seed};
pub use stage::{Cluster, cluster_for_chapter, stage_for_chapter, stage_section};
pub use structure::{NarrativeStructure, PlannedStage, StoryScale, TagProfile, plan_structure};
