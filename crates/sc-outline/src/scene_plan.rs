//! Scene plans: where each scene of a chapter ends and what its image shows.
//!
//! ```text
//! ## Scene 1:
//! Range: 40
//! A narrow bridge over black water, lanterns swaying.
//!
//! **画面2：**
//! **范围**：[100]
//! 城门在雨中打开。
//! ```
//!
//! Blocks without a range line are skipped.

use serde::{Deserialize, Serialize};

use crate::field::{lines_with_spans, line_field, numbers, strip_line_markup, strip_prefix_ignore_case};

const RANGE_LABELS: &[&str] = &["range", "范围"];

/// One planned scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedScene {
    /// Percentage of the chapter at which the scene ends.
    pub range: u32,
    /// Image prompt: the block text without its range line.
    pub prompt: String,
}

/// The scenes planned for a chapter, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenePlan {
    /// Planned scenes.
    pub scenes: Vec<PlannedScene>,
}

impl ScenePlan {
    /// Number of planned scenes.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Returns `true` if no scene was planned.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Image prompts in scene order.
    pub fn prompts(&self) -> Vec<String> {
        self.scenes.iter().map(|s| s.prompt.clone()).collect()
    }

    /// Scene end percentages made safe for splitting: clamped to 100,
    /// never decreasing, and ending at 100.
    pub fn percentages(&self) -> Vec<u32> {
        let mut floor = 0;
        let mut percentages: Vec<u32> = self
            .scenes
            .iter()
            .map(|scene| {
                floor = scene.range.min(100).max(floor);
                floor
            })
            .collect();
        if let Some(last) = percentages.last_mut() {
            *last = 100;
        }
        percentages
    }
}

/// Whether `line` opens a scene block: `Scene 1:` / `画面1：`, optionally
/// bold or a heading.
fn is_scene_heading(line: &str) -> bool {
    let line = strip_line_markup(line);
    let Some(rest) = strip_prefix_ignore_case(line, "scene").or_else(|| line.strip_prefix("画面")) else {
        return false;
    };
    let rest = rest.trim_start();
    let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    digits > 0 && rest[digits..].trim_start_matches('*').trim_start().starts_with([':', '：'])
}

fn planned_scene(block: &str) -> Option<PlannedScene> {
    let range = block
        .lines()
        .find_map(|line| line_field(line, RANGE_LABELS))
        .and_then(|value| numbers(value).next())?;
    let prompt = block
        .lines()
        .filter(|line| line_field(line, RANGE_LABELS).is_none())
        .collect::<Vec<_>>()
        .join("\n");
    Some(PlannedScene {
        range,
        prompt: prompt.trim().to_string(),
    })
}

/// Parse a scene-planning reply.
pub fn parse_scene_plan(text: &str) -> ScenePlan {
    let starts: Vec<(usize, usize)> = lines_with_spans(text)
        .filter(|(_, line)| is_scene_heading(line))
        .map(|(span, _)| (span.start, span.end))
        .collect();

    let scenes = starts
        .iter()
        .enumerate()
        .filter_map(|(i, &(_, body_start))| {
            let end = starts.get(i + 1).map_or(text.len(), |&(next, _)| next);
            planned_scene(&text[body_start..end])
        })
        .collect();
    ScenePlan { scenes }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_heading_styles() {
        let plan = parse_scene_plan(
            "Intro line.\n\
             ## Scene 1:\n\
             Range: 40\n\
             A narrow bridge over black water.\n\
             \n\
             **画面2：**\n\
             **范围**：[100]\n\
             城门在雨中打开。\n",
        );
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.scenes[0].range, 40);
        assert_eq!(plan.scenes[0].prompt, "A narrow bridge over black water.");
        assert_eq!(plan.scenes[1].range, 100);
        assert_eq!(plan.prompts()[1], "城门在雨中打开。");
        assert_eq!(plan.percentages(), vec![40, 100]);
    }

    #[test]
    fn blocks_without_range_are_skipped() {
        let plan = parse_scene_plan("Scene 1: \nno range\nScene 2:\n### Range: 70\nfog\n");
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.scenes[0].range, 70);
        assert_eq!(plan.scenes[0].prompt, "fog");
    }

    #[test]
    fn percentages_are_made_safe() {
        let scene = |range| PlannedScene {
            range,
            prompt: String::new(),
        };
        let plan = ScenePlan {
            scenes: vec![scene(60), scene(30), scene(250), scene(90)],
        };
        assert_eq!(plan.percentages(), vec![60, 60, 100, 100]);
        let plan = ScenePlan {
            scenes: vec![scene(20), scene(70)],
        };
        assert_eq!(plan.percentages(), vec![20, 100]);
        assert!(ScenePlan::default().percentages().is_empty());
    }

    #[test]
    fn trailing_whitespace_after_range() {
        let plan = parse_scene_plan("Scene 1:  \nRange: 50  \nA bridge.\n\n画面2： \n范围：[100] \n城门。");
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.scenes[0].range, 50);
        assert_eq!(plan.scenes[0].prompt, "A bridge.");
        assert_eq!(plan.scenes[1].range, 100);
        assert_eq!(plan.percentages(), vec![50, 100]);
    }

    #[test]
    fn no_scenes() {
        assert!(parse_scene_plan("Scenery is nice.\nScene one: later").is_empty());
    }
}
