//! Prompts sent to the text generator.

use sc_outline::{EndingOutline, chapter_block, cluster_for_chapter, stage_for_chapter};

/// Characters of the previous chapter quoted at the start of a chapter prompt.
const PREVIOUS_TAIL_CHARS: usize = 500;
/// Characters of the last chapter quoted in an ending prompt.
const LAST_TAIL_CHARS: usize = 800;
const NONE_FIRST_CHAPTER: &str = "none (this is the first chapter)";

/// Everything needed to ask for one chapter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterBrief {
    /// Chapter to write, 1-based.
    pub chapter_index: u32,
    /// Planned number of chapters.
    pub total_chapters: u32,
    /// Core story seed.
    pub core_seed: String,
    /// Narrative architecture document.
    pub architecture: String,
    /// Chapter directory document.
    pub directory: String,
    /// Running summary of the story so far.
    pub story_summary: String,
    /// Full text of the previous chapter.
    pub previous_chapter: String,
    /// Extra instructions from the author.
    pub instructions: String,
}

impl ChapterBrief {
    /// A brief for `chapter_index` of `total_chapters` with empty documents.
    pub fn new(chapter_index: u32, total_chapters: u32) -> Self {
        Self {
            chapter_index,
            total_chapters,
            ..Self::default()
        }
    }

    /// Set the core seed.
    pub fn with_core_seed(mut self, seed: impl Into<String>) -> Self {
        self.core_seed = seed.into();
        self
    }

    /// Set the architecture document.
    pub fn with_architecture(mut self, architecture: impl Into<String>) -> Self {
        self.architecture = architecture.into();
        self
    }

    /// Set the chapter directory document.
    pub fn with_directory(mut self, directory: impl Into<String>) -> Self {
        self.directory = directory.into();
        self
    }

    /// Set the running story summary.
    pub fn with_story_summary(mut self, summary: impl Into<String>) -> Self {
        self.story_summary = summary.into();
        self
    }

    /// Set the previous chapter's text.
    pub fn with_previous_chapter(mut self, text: impl Into<String>) -> Self {
        self.previous_chapter = text.into();
        self
    }

    /// Set extra author instructions.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = instructions.into();
        self
    }

    /// The chapter prompt.
    pub fn prompt(&self) -> String {
        let index = self.chapter_index;
        let stage = stage_for_chapter(&self.architecture, index);
        let cluster = cluster_for_chapter(&self.architecture, index);
        let next = if index < self.total_chapters {
            chapter_block(&self.directory, index + 1)
        } else {
            "none (final chapter, endings follow)".to_string()
        };
        let tasks: String = stage.tasks.iter().map(|task| format!("- {task}\n")).collect();

        format!(
            "Write chapter {index} of {total}.\n\
             \n\
             ## Core seed\n{seed}\n\
             \n\
             ## Stage\n\
             {stage_name} (chapters {start}-{end})\n\
             Goal: {goal}\n\
             Tone: {tone}\n\
             Key tasks:\n{tasks}\
             Focus attributes: {focus}\n\
             Character interactions: {characters}\n\
             Cluster: {cluster} (theme: {theme}; choice weight: {weight})\n\
             \n\
             ## This chapter\n{current}\n\
             \n\
             ## Next chapter\n{next}\n\
             \n\
             ## Story so far\n{summary}\n\
             \n\
             ## End of the previous chapter\n{previous}\n\
             \n\
             ## Notes\n{notes}\n\
             \n\
             Start with a header line \"Chapter {index} - <title>\". Put each player \
             choice on its own line as \"→ A. <choice> [effect: <attribute>+N]\" followed \
             by a one-line reaction.",
            total = self.total_chapters,
            seed = self.core_seed.trim(),
            stage_name = stage.stage_name,
            start = stage.start_chapter,
            end = stage.end_chapter,
            goal = stage.goal,
            tone = stage.tone,
            focus = stage.focus_attributes,
            characters = stage.character_interactions,
            cluster = cluster.name,
            theme = cluster.emotional_theme,
            weight = cluster.choice_weight,
            current = chapter_block(&self.directory, index),
            summary = or_else(&self.story_summary, NONE_FIRST_CHAPTER),
            previous = or_else(tail(&self.previous_chapter, PREVIOUS_TAIL_CHARS), NONE_FIRST_CHAPTER),
            notes = or_else(&self.instructions, "none"),
        )
    }
}

fn or_else<'a>(text: &'a str, fallback: &'a str) -> &'a str {
    let text = text.trim();
    if text.is_empty() { fallback } else { text }
}

/// The last `chars` characters of `text`.
fn tail(text: &str, chars: usize) -> &str {
    let skip = text.chars().count().saturating_sub(chars);
    text.char_indices()
        .nth(skip)
        .map_or("", |(at, _)| &text[at..])
}

/// Prompt asking for an updated running summary after a new chapter.
pub fn summary_prompt(previous_summary: &str, chapter_text: &str) -> String {
    format!(
        "Update the story summary with the new chapter. Reply with the summary only.\n\
         \n\
         ## Summary so far\n{}\n\
         \n\
         ## New chapter\n{}",
        or_else(previous_summary, NONE_FIRST_CHAPTER),
        chapter_text.trim()
    )
}

/// Prompt asking for a scene plan of a finished chapter.
pub fn scene_plan_prompt(chapter_text: &str) -> String {
    format!(
        "Plan background images for the chapter below. For each scene write a block:\n\
         \n\
         Scene N:\n\
         Range: <percentage of the chapter where the scene ends>\n\
         <image description>\n\
         \n\
         Ranges increase and the last one is 100.\n\
         \n\
         ## Chapter\n{}",
        chapter_text.trim()
    )
}

/// Prompt asking for one ending.
pub fn ending_prompt(
    ending: &EndingOutline,
    architecture: &str,
    last_chapter: &str,
    story_summary: &str,
) -> String {
    format!(
        "Write the ending \"{title}\".\n\
         \n\
         ## Architecture\n{architecture}\n\
         \n\
         ## End of the last chapter\n{last}\n\
         \n\
         ## Story so far\n{summary}\n\
         \n\
         ## Trigger condition\n{condition}\n\
         \n\
         ## Ending summary\n{ending_summary}",
        title = ending.title,
        architecture = architecture.trim(),
        last = tail(last_chapter, LAST_TAIL_CHARS).trim(),
        summary = story_summary.trim(),
        condition = ending.condition,
        ending_summary = ending.summary,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIRECTORY: &str = "Chapter 1 - Surface\nOutline: hire a boat\n\nChapter 2 - Descent\nOutline: dive\n";

    #[test]
    fn chapter_prompt_quotes_current_and_next_entries() {
        let prompt = ChapterBrief::new(1, 2).with_directory(DIRECTORY).prompt();
        assert!(prompt.starts_with("Write chapter 1 of 2."));
        assert!(prompt.contains("## This chapter\nChapter 1 - Surface\nOutline: hire a boat\n"));
        assert!(prompt.contains("## Next chapter\nChapter 2 - Descent\nOutline: dive\n"));
        assert!(prompt.contains("Goal: infer from outline"));
        assert!(prompt.contains("## Story so far\nnone (this is the first chapter)"));
    }

    #[test]
    fn final_chapter_has_no_next_entry() {
        let prompt = ChapterBrief::new(2, 2).with_directory(DIRECTORY).prompt();
        assert!(prompt.contains("## Next chapter\nnone (final chapter, endings follow)"));
    }

    #[test]
    fn tail_counts_chars() {
        assert_eq!(tail("一二三四", 2), "三四");
        assert_eq!(tail("ab", 5), "ab");
        assert_eq!(tail("", 5), "");
    }

    #[test]
    fn ending_prompt_carries_condition() {
        let ending = EndingOutline {
            title: "Return".to_string(),
            condition: "courage high".to_string(),
            summary: "home".to_string(),
        };
        let prompt = ending_prompt(&ending, "arch", "last words", "so far");
        assert!(prompt.contains("## Trigger condition\ncourage high"));
        assert!(prompt.ends_with("## Ending summary\nhome"));
    }
}
