use sc_core::{ChoiceGroup, Dialogue, ParsedChapter, Scene};

use crate::choice::ChoiceGroupScanner;
use crate::chunker::NarrationChunker;
use crate::config::ParseConfig;
use crate::header::{body_range, extract_header};
use crate::split::SafeRangeSplitter;

/// Builds a [`ParsedChapter`] from raw chapter text.
#[derive(Debug, Clone, Copy)]
pub struct ChapterAssembler {
    narration: NarrationChunker,
    scanner: ChoiceGroupScanner,
    splitter: SafeRangeSplitter,
}

impl Default for ChapterAssembler {
    fn default() -> Self {
        Self::new(&ParseConfig::default())
    }
}

impl ChapterAssembler {
    /// Build an assembler from the parse configuration.
    pub fn new(config: &ParseConfig) -> Self {
        Self {
            narration: NarrationChunker::new(config.narration)
                .with_sentence_cap(config.sentence_cap),
            scanner: ChoiceGroupScanner::new(config),
            splitter: SafeRangeSplitter::new(config),
        }
    }

    /// Parse `raw` into scenes cut at `percentages`.
    ///
    /// Scene spans are byte ranges into the header-stripped body (see
    /// [`body_range`](crate::header::body_range)).
    pub fn assemble(&self, raw: &str, percentages: &[u32]) -> ParsedChapter {
        let header = extract_header(raw);
        let body = &raw[body_range(raw)];

        let groups = self.scanner.scan(body);
        let scenes = self
            .splitter
            .split(body, percentages, &groups)
            .into_iter()
            .enumerate()
            .map(|(i, span)| {
                let segment = &body[span.clone()];
                let local_groups = self.scanner.scan(segment);
                Scene {
                    id: i as u32 + 1,
                    dialogues: self.dialogues(segment, &local_groups),
                    span,
                }
            })
            .collect();

        ParsedChapter {
            chapter_index: header.index,
            title: header.title,
            scenes,
        }
    }

    /// Interleave narration chunks with choice groups.
    fn dialogues(&self, text: &str, groups: &[ChoiceGroup]) -> Vec<Dialogue> {
        let mut dialogues = Vec::new();
        let mut cursor = 0;

        for group in groups {
            let mut chunks = self.narration.chunk(&text[cursor..group.span.start]);
            let last = chunks.pop().unwrap_or_default();
            dialogues.extend(chunks.into_iter().map(Dialogue::narration));
            dialogues.push(Dialogue::with_choices(last, group.choices.clone()));
            cursor = group.span.end;
        }

        dialogues.extend(
            self.narration
                .chunk(&text[cursor..])
                .into_iter()
                .map(Dialogue::narration),
        );
        dialogues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narration_only_chapter() {
        let chapter = ChapterAssembler::default().assemble(
            "Chapter 2 - Rain\n\nIt rained all day. Nobody came to the door.",
            &[100],
        );
        assert_eq!(chapter.chapter_index, 2);
        assert_eq!(chapter.title, "Rain");
        assert_eq!(chapter.scenes.len(), 1);
        assert!(chapter.dialogues().all(|d| d.player_choices.is_none()));
    }

    #[test]
    fn group_without_preceding_narration() {
        let chapter = ChapterAssembler::default()
            .assemble("→ A. go [effect: x+1]\n→ B. stay [effect: x-1]\n", &[100]);
        let dialogues = &chapter.scenes[0].dialogues;
        assert_eq!(dialogues.len(), 1);
        assert_eq!(dialogues[0].narration, "");
        assert_eq!(dialogues[0].choices().map(<[_]>::len), Some(2));
    }

    #[test]
    fn long_narration_before_group_splits_into_dialogues() {
        let long = format!("{}。", "长".repeat(59));
        let raw = format!("{long}{long}\n→ A. 走【属性：勇气+1】\n→ B. 留【属性：勇气-1】\n");
        let chapter = ChapterAssembler::default().assemble(&raw, &[100]);
        let dialogues = &chapter.scenes[0].dialogues;
        assert_eq!(dialogues.len(), 2);
        assert!(dialogues[0].player_choices.is_none());
        assert_eq!(dialogues[1].narration, long);
        assert!(dialogues[1].player_choices.is_some());
    }

    #[test]
    fn scene_spans_tile_body() {
        let raw = "Chapter 1 - A\n\nOne. Two.\n\nThree. Four.";
        let chapter = ChapterAssembler::default().assemble(raw, &[50, 100]);
        let body = &raw[body_range(raw)];
        let joined: String = chapter
            .scenes
            .iter()
            .map(|s| &body[s.span.clone()])
            .collect();
        assert_eq!(joined, body);
        let ids: Vec<_> = chapter.scenes.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn empty_body_has_no_scenes() {
        let chapter = ChapterAssembler::default().assemble("Chapter 9 - Empty\n", &[100]);
        assert_eq!(chapter.chapter_index, 9);
        assert!(chapter.scenes.is_empty());
    }
}
