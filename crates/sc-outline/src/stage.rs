//! Stage and cluster lookup by chapter number.
//!
//! A stage-planning section holds one sub-heading per stage, each with a
//! chapter range line:
//!
//! ```text
//! ## Stage Plan
//! ### Stage 1: Arrival
//! **Chapter range**: 1-3
//! **Core goal**: reach the city
//! **Emotional tone**: wonder
//! **Key tasks**:
//! - Task 1: cross the bridge
//! - Task 2: meet the guide
//! **Attribute focus**: courage
//! ```
//!
//! Attribute showcase and character blueprint sections elsewhere in the
//! document refer to stages by the part of their title before the colon
//! (`Stage 1`, `阶段一`).

use std::ops::Range;

use serde::{Deserialize, Serialize};

use sc_core::{ArchitectureSection, StageFields};

use crate::field::{clean_value, field, field_block, numbers, strip_line_markup};
use crate::section::{Heading, children, find_any_section};

/// Fallback for stage names, goals, tones, and cluster names.
pub const INFER_FROM_OUTLINE: &str = "infer from outline";
/// Fallback for a stage's focus attributes.
pub const ALL_ATTRIBUTES: &str = "all attributes";
/// Fallback for a stage's character interactions.
pub const ALL_CORE_CHARACTERS: &str = "all core characters";
/// Fallback task list.
pub const DEFAULT_TASKS: &[&str] = &[
    "advance the main plot",
    "deepen character relationships",
    "showcase key attributes",
];
/// Fallback cluster choice weight.
pub const DEFAULT_CHOICE_WEIGHT: &str = "medium";

const STAGE_SECTIONS: &[&str] = &["stage plan", "stages", "阶段详细规划", "阶段规划"];
const CLUSTER_SECTIONS: &[&str] = &["chapter cluster", "clusters", "章节集群设计", "章节集群"];
const SHOWCASE_SECTIONS: &[&str] = &["attribute showcase", "属性展示规划"];
const BLUEPRINT_SECTIONS: &[&str] = &["character interaction", "character blueprint", "角色互动蓝图"];

const RANGE_LABELS: &[&str] = &["chapter range", "chapters", "章节范围"];
const GOAL_LABELS: &[&str] = &["core goal", "goal", "核心目标"];
const TONE_LABELS: &[&str] = &["emotional tone", "tone", "情感基调"];
const TASK_LABELS: &[&str] = &["key tasks", "tasks", "关键任务"];
const FOCUS_LABELS: &[&str] = &["attribute focus", "focus attributes", "属性聚焦"];
const CHARACTER_LABELS: &[&str] = &["character development", "角色发展"];
const THEME_LABELS: &[&str] = &["emotional theme", "theme", "情感主题"];
const WEIGHT_LABELS: &[&str] = &["choice weight", "weight", "选择权重"];

/// The chapter cluster a chapter belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    /// Cluster heading.
    pub name: String,
    /// Emotional theme; empty when not given.
    pub emotional_theme: String,
    /// How heavily the cluster's choices weigh.
    pub choice_weight: String,
}

impl Cluster {
    /// The cluster used when none covers a chapter.
    pub fn fallback() -> Self {
        Self {
            name: INFER_FROM_OUTLINE.to_string(),
            emotional_theme: String::new(),
            choice_weight: DEFAULT_CHOICE_WEIGHT.to_string(),
        }
    }
}

/// A sub-heading block with a chapter range.
struct RangedBlock {
    heading: Heading,
    body: Range<usize>,
    start: u32,
    end: u32,
}

/// Parse `1-3`, `第1-3章`, or a single chapter number into an inclusive range.
fn parse_chapter_range(value: &str) -> Option<(u32, u32)> {
    let mut nums = numbers(value);
    let first = nums.next()?;
    let second = nums.next().unwrap_or(first);
    Some((first.min(second), first.max(second)))
}

fn ranged_blocks(doc: &str, sections: &[&str]) -> Vec<RangedBlock> {
    let Some((_, section)) = find_any_section(doc, sections) else {
        return Vec::new();
    };
    children(doc, section)
        .into_iter()
        .filter_map(|(heading, body)| {
            let (start, end) = parse_chapter_range(field(&doc[body.clone()], RANGE_LABELS)?)?;
            Some(RangedBlock {
                heading,
                body,
                start,
                end,
            })
        })
        .collect()
}

fn block_for_chapter(doc: &str, sections: &[&str], chapter: u32) -> Option<RangedBlock> {
    ranged_blocks(doc, sections)
        .into_iter()
        .find(|block| block.start <= chapter && chapter <= block.end)
}

/// The part of a stage title before its colon: `Stage 1` of `Stage 1: Arrival`.
fn stage_tag(title: &str) -> &str {
    title
        .split([':', '：'])
        .next()
        .map_or(title, str::trim)
}

/// Whether `text` mentions `tag` not followed by more letters or digits,
/// so `Stage 1` does not match `Stage 12`.
fn mentions(text: &str, tag: &str) -> bool {
    !tag.is_empty()
        && text.match_indices(tag).any(|(at, _)| {
            !text[at + tag.len()..]
                .chars()
                .next()
                .is_some_and(char::is_alphanumeric)
        })
}

fn list_separator(tag: &str) -> &'static str {
    if tag.is_ascii() { ", " } else { "、" }
}

/// Name before the colon of a `- **Name**: ...` line, and the rest.
fn split_named_line(line: &str) -> Option<(&str, &str)> {
    let (name, rest) = strip_line_markup(line).split_once([':', '：'])?;
    let name = clean_value(name);
    (!name.is_empty()).then_some((name, rest))
}

fn showcased_attributes(doc: &str, tag: &str) -> Option<String> {
    let (_, section) = find_any_section(doc, SHOWCASE_SECTIONS)?;
    let names: Vec<&str> = doc[section]
        .lines()
        .filter_map(split_named_line)
        .filter(|(_, rest)| mentions(rest, tag))
        .map(|(name, _)| name)
        .collect();
    (!names.is_empty()).then(|| names.join(list_separator(tag)))
}

#[derive(Clone, Copy)]
enum Interaction {
    KeyMoment,
    Bonding,
    Deepening,
}

impl Interaction {
    fn describe(self, name: &str, cjk: bool) -> String {
        match (self, cjk) {
            (Interaction::KeyMoment, false) => format!("{name} (key moment)"),
            (Interaction::Bonding, false) => format!("{name} (bonding)"),
            (Interaction::Deepening, false) => format!("{name} (deepening)"),
            (Interaction::KeyMoment, true) => format!("{name}（关键互动时刻）"),
            (Interaction::Bonding, true) => format!("{name}（情感联结）"),
            (Interaction::Deepening, true) => format!("{name}（关系深化）"),
        }
    }
}

/// How a blueprint line's character relates to a stage and chapter.
///
/// Line parts are `label = [value]` pairs separated by semicolons; a key
/// moment in `chapter` outranks bonding, which outranks deepening.
fn interaction(rest: &str, tag: &str, chapter: u32) -> Option<Interaction> {
    let mut found: Option<Interaction> = None;
    for part in rest.split([';', '；']) {
        let Some((label, value)) = part.split_once('=') else {
            continue;
        };
        let label = label.to_lowercase();
        let candidate = if label.contains("key") || label.contains("关键") {
            numbers(value)
                .any(|n| n == chapter)
                .then_some(Interaction::KeyMoment)
        } else if label.contains("bond") || label.contains("connect") || label.contains("联结") {
            mentions(value, tag).then_some(Interaction::Bonding)
        } else if label.contains("deepen") || label.contains("深化") {
            mentions(value, tag).then_some(Interaction::Deepening)
        } else {
            None
        };
        found = match (found, candidate) {
            (Some(Interaction::KeyMoment), _) => found,
            (_, Some(Interaction::KeyMoment)) => candidate,
            (Some(Interaction::Bonding), _) => found,
            (None, _) => candidate,
            (Some(Interaction::Deepening), _) => candidate.or(found),
        };
    }
    found
}

fn character_interactions(doc: &str, tag: &str, chapter: u32) -> Option<String> {
    let (_, section) = find_any_section(doc, BLUEPRINT_SECTIONS)?;
    let cjk = !tag.is_ascii();
    let entries: Vec<String> = doc[section]
        .lines()
        .filter_map(split_named_line)
        .filter_map(|(name, rest)| {
            interaction(rest, tag, chapter).map(|kind| kind.describe(name, cjk))
        })
        .collect();
    (!entries.is_empty()).then(|| entries.join(list_separator(tag)))
}

/// Strip list markers and a `Task N:` / `任务N：` prefix from a task line.
fn task_text(line: &str) -> &str {
    let item = line
        .trim()
        .trim_start_matches(['-', '*', '+'])
        .trim_start_matches(|c: char| c.is_ascii_digit())
        .trim_start_matches(['.', '、', ')'])
        .trim();
    let prefixed = crate::field::strip_prefix_ignore_case(item, "task")
        .or_else(|| item.strip_prefix("任务"))
        .map(|rest| {
            rest.trim_start()
                .trim_start_matches(|c: char| c.is_ascii_digit() || "一二三四五六七八九十".contains(c))
        })
        .and_then(|rest| rest.strip_prefix([':', '：']));
    clean_value(prefixed.unwrap_or(item))
}

fn tasks(body: &str) -> Vec<String> {
    let tasks: Vec<String> = field_block(body, TASK_LABELS)
        .map(|block| {
            block
                .lines()
                .map(task_text)
                .filter(|task| !task.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    if tasks.is_empty() {
        DEFAULT_TASKS.iter().map(|task| task.to_string()).collect()
    } else {
        tasks
    }
}

fn fallback_stage() -> StageFields {
    StageFields {
        stage_name: INFER_FROM_OUTLINE.to_string(),
        start_chapter: 1,
        end_chapter: 1,
        goal: INFER_FROM_OUTLINE.to_string(),
        tone: INFER_FROM_OUTLINE.to_string(),
        tasks: DEFAULT_TASKS.iter().map(|task| task.to_string()).collect(),
        focus_attributes: ALL_ATTRIBUTES.to_string(),
        character_interactions: ALL_CORE_CHARACTERS.to_string(),
    }
}

fn stage_fields(doc: &str, block: &RangedBlock, chapter: u32) -> StageFields {
    let body = &doc[block.body.clone()];
    let tag = stage_tag(&block.heading.title);
    let or_infer = |value: Option<&str>| value.unwrap_or(INFER_FROM_OUTLINE).to_string();

    StageFields {
        stage_name: block.heading.title.clone(),
        start_chapter: block.start,
        end_chapter: block.end,
        goal: or_infer(field(body, GOAL_LABELS)),
        tone: or_infer(field(body, TONE_LABELS)),
        tasks: tasks(body),
        focus_attributes: field(body, FOCUS_LABELS)
            .map(str::to_string)
            .or_else(|| showcased_attributes(doc, tag))
            .unwrap_or_else(|| ALL_ATTRIBUTES.to_string()),
        character_interactions: character_interactions(doc, tag, chapter)
            .or_else(|| field(body, CHARACTER_LABELS).map(str::to_string))
            .unwrap_or_else(|| ALL_CORE_CHARACTERS.to_string()),
    }
}

/// Stage sub-fields for the stage whose chapter range covers `chapter`.
///
/// Every field that cannot be found holds its fallback; with no covering
/// stage at all, the whole result is the fallback stage (chapters 1–1).
pub fn stage_for_chapter(doc: &str, chapter: u32) -> StageFields {
    block_for_chapter(doc, STAGE_SECTIONS, chapter)
        .map_or_else(fallback_stage, |block| stage_fields(doc, &block, chapter))
}

/// The stage block covering `chapter` as a section, with its sub-fields.
///
/// With no covering stage the section is empty and carries the fallback
/// fields.
pub fn stage_section(doc: &str, chapter: u32) -> ArchitectureSection {
    match block_for_chapter(doc, STAGE_SECTIONS, chapter) {
        Some(block) => ArchitectureSection {
            name: block.heading.title.clone(),
            text: doc[block.body.clone()].to_string(),
            fields: Some(stage_fields(doc, &block, chapter)),
        },
        None => ArchitectureSection {
            name: INFER_FROM_OUTLINE.to_string(),
            text: String::new(),
            fields: Some(fallback_stage()),
        },
    }
}

/// The chapter cluster whose range covers `chapter`, or [`Cluster::fallback`].
pub fn cluster_for_chapter(doc: &str, chapter: u32) -> Cluster {
    let Some(block) = block_for_chapter(doc, CLUSTER_SECTIONS, chapter) else {
        return Cluster::fallback();
    };
    let body = &doc[block.body];
    Cluster {
        name: block.heading.title,
        emotional_theme: field(body, THEME_LABELS).unwrap_or_default().to_string(),
        choice_weight: field(body, WEIGHT_LABELS)
            .unwrap_or(DEFAULT_CHOICE_WEIGHT)
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAN: &str = "\
## Stage Plan

### Stage 1: Arrival
**Chapter range**: 1-3
**Core goal**: reach the city
**Emotional tone**: wonder
**Key tasks**:
- Task 1: cross the bridge
- Task 2: meet the guide
**Attribute focus**: courage

### Stage 2: Descent
**Chapter range**: 4-6
**Core goal**: find the archive

## Chapter Clusters
### Cluster 1: First steps
Chapter range: 1-2
Emotional theme: curiosity
Choice weight: high

## Attribute Showcase
- **courage**: showcase stages = [Stage 1]
- **wisdom**: showcase stages = [Stage 2, Stage 12]
- **charm**: showcase stages = [Stage 12]

## Character Interaction Blueprint
- **Mira**: bonding stages = [Stage 1]; deepening stages = [Stage 2]; key moments = [chapter 5]
- **Tobin**: bonding stages = [Stage 2]
";

    #[test]
    fn stage_fields_for_covered_chapter() {
        let stage = stage_for_chapter(PLAN, 2);
        assert_eq!(stage.stage_name, "Stage 1: Arrival");
        assert_eq!((stage.start_chapter, stage.end_chapter), (1, 3));
        assert_eq!(stage.goal, "reach the city");
        assert_eq!(stage.tone, "wonder");
        assert_eq!(stage.tasks, vec!["cross the bridge", "meet the guide"]);
        assert_eq!(stage.focus_attributes, "courage");
        assert_eq!(stage.character_interactions, "Mira (bonding)");
        assert!(stage.covers(3));
    }

    #[test]
    fn missing_fields_fall_back() {
        let stage = stage_for_chapter(PLAN, 5);
        assert_eq!(stage.stage_name, "Stage 2: Descent");
        assert_eq!(stage.tone, INFER_FROM_OUTLINE);
        assert_eq!(stage.tasks, DEFAULT_TASKS);
        assert_eq!(stage.focus_attributes, "wisdom");
        assert_eq!(stage.character_interactions, "Mira (key moment), Tobin (bonding)");
    }

    #[test]
    fn uncovered_chapter_is_fallback_stage() {
        let stage = stage_for_chapter(PLAN, 9);
        assert_eq!(stage, fallback_stage());
        assert_eq!(stage_for_chapter("", 1).focus_attributes, ALL_ATTRIBUTES);
        assert!(stage_section(PLAN, 9).is_empty());
    }

    #[test]
    fn stage_section_carries_body_and_fields() {
        let section = stage_section(PLAN, 4);
        assert_eq!(section.name, "Stage 2: Descent");
        assert_eq!(section.text, "**Chapter range**: 4-6\n**Core goal**: find the archive");
        assert_eq!(section.fields.map(|f| f.goal).as_deref(), Some("find the archive"));
    }

    #[test]
    fn cjk_stage_plan() {
        let doc = "\
## 阶段详细规划
### 阶段一：觉醒
**章节范围**：第1-3章
**核心目标**：离开村庄
**情感基调**：紧张
**关键任务**：
- 任务1：找到地图
- 任务2：告别家人

## 属性系统整合
### 属性展示规划
- **勇气**：重点展示阶段 = [阶段一, 阶段三]
- **智慧**：重点展示阶段 = [阶段一]

## 角色互动蓝图
- **林**：情感联结阶段 = [阶段一]；关键互动时刻 = [第2章]
";
        let stage = stage_for_chapter(doc, 2);
        assert_eq!(stage.stage_name, "阶段一：觉醒");
        assert_eq!(stage.goal, "离开村庄");
        assert_eq!(stage.tasks, vec!["找到地图", "告别家人"]);
        assert_eq!(stage.focus_attributes, "勇气、智慧");
        assert_eq!(stage.character_interactions, "林（关键互动时刻）");
    }

    #[test]
    fn cluster_lookup() {
        let cluster = cluster_for_chapter(PLAN, 2);
        assert_eq!(cluster.name, "Cluster 1: First steps");
        assert_eq!(cluster.emotional_theme, "curiosity");
        assert_eq!(cluster.choice_weight, "high");
        assert_eq!(cluster_for_chapter(PLAN, 3), Cluster::fallback());
    }

    #[test]
    fn chapter_range_forms() {
        assert_eq!(parse_chapter_range("1-3"), Some((1, 3)));
        assert_eq!(parse_chapter_range("第4–6章"), Some((4, 6)));
        assert_eq!(parse_chapter_range("7"), Some((7, 7)));
        assert_eq!(parse_chapter_range("9-8"), Some((8, 9)));
        assert_eq!(parse_chapter_range("soon"), None);
    }

    #[test]
    fn tags_do_not_match_longer_numbers() {
        assert!(mentions("[Stage 1, Stage 2]", "Stage 1"));
        assert!(!mentions("[Stage 12]", "Stage 1"));
        assert!(!mentions("anything", ""));
    }
}
