//! Packing sentences into display-sized narration chunks.

use std::ops::Range;

use crate::config::{ChunkBounds, MergeShort};
use crate::sentence::{DEFAULT_SENTENCE_CAP, SentenceSplitter};

/// A normalised text block together with the spans of its chunks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedText {
    /// The normalised text.
    pub text: String,
    /// Byte spans of each chunk in `text`. They tile `text` exactly.
    pub spans: Vec<Range<usize>>,
}

impl ChunkedText {
    /// The trimmed chunks.
    pub fn chunks(&self) -> impl Iterator<Item = &str> {
        self.spans.iter().map(|span| self.text[span.clone()].trim())
    }

    /// The trimmed chunks, owned.
    pub fn into_chunks(self) -> Vec<String> {
        self.chunks().map(str::to_string).collect()
    }
}

/// Greedy sentence packer with a short-chunk merge pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NarrationChunker {
    bounds: ChunkBounds,
    sentence_cap: usize,
}

/// A chunk under construction: its span and its length in `char`s.
#[derive(Debug, Clone)]
struct Packed {
    span: Range<usize>,
    len: usize,
}

impl NarrationChunker {
    /// A chunker with the given bounds and the default sentence cap.
    pub fn new(bounds: ChunkBounds) -> Self {
        Self {
            bounds,
            sentence_cap: DEFAULT_SENTENCE_CAP,
        }
    }

    /// Set the sentence splitter's forced-split length.
    pub fn with_sentence_cap(mut self, cap: usize) -> Self {
        self.sentence_cap = cap.max(1);
        self
    }

    /// Chunk `text`, keeping the normalised text and chunk spans.
    pub fn chunk_spans(&self, text: &str) -> ChunkedText {
        let splitter = SentenceSplitter::new(text).with_cap(self.sentence_cap);
        let normalized = splitter.text();
        let max_len = self.bounds.max_len;

        let mut packed: Vec<Packed> = Vec::new();
        let mut buffer: Option<Packed> = None;

        for span in splitter.spans() {
            let len = normalized[span.clone()].trim().chars().count();
            buffer = match buffer.take() {
                None if len >= max_len => {
                    packed.push(Packed { span, len });
                    None
                }
                None => Some(Packed { span, len }),
                Some(mut buf) if buf.len + len <= max_len => {
                    buf.span.end = span.end;
                    buf.len += len;
                    Some(buf)
                }
                Some(buf) => {
                    packed.push(buf);
                    Some(Packed { span, len })
                }
            };
        }
        packed.extend(buffer);

        let merged = self.merge_short(packed);
        ChunkedText {
            text: normalized.to_string(),
            spans: merged.into_iter().map(|p| p.span).collect(),
        }
    }

    /// Chunk `text` into trimmed, non-empty chunks.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        self.chunk_spans(text).into_chunks()
    }

    fn merge_short(&self, packed: Vec<Packed>) -> Vec<Packed> {
        let min_len = self.bounds.min_len;
        match self.bounds.merge {
            MergeShort::Any => {
                let mut merged: Vec<Packed> = Vec::with_capacity(packed.len());
                for chunk in packed {
                    match merged.last_mut() {
                        Some(prev) if chunk.len < min_len => {
                            prev.span.end = chunk.span.end;
                            prev.len += chunk.len;
                        }
                        _ => merged.push(chunk),
                    }
                }
                merged
            }
            MergeShort::TrailingOnly => {
                let mut merged = packed;
                let n = merged.len();
                if n >= 2 && merged[n - 1].len < min_len {
                    let last = merged.remove(n - 1);
                    let prev = &mut merged[n - 2];
                    prev.span.end = last.span.end;
                    prev.len += last.len;
                }
                merged
            }
        }
    }
}

/// Chunk main narration with the default narration bounds.
pub fn chunk_narrations(text: &str) -> Vec<String> {
    NarrationChunker::new(ChunkBounds::NARRATION).chunk(text)
}

/// Chunk a choice reaction with the default reaction bounds.
pub fn chunk_reaction(text: &str) -> Vec<String> {
    NarrationChunker::new(ChunkBounds::REACTION).chunk(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lens(chunks: &[String]) -> Vec<usize> {
        chunks.iter().map(|c| c.chars().count()).collect()
    }

    #[test]
    fn short_text_is_one_chunk() {
        assert_eq!(
            chunk_narrations("It rained. We ran."),
            vec!["It rained. We ran."]
        );
    }

    #[test]
    fn empty_text_has_no_chunks() {
        assert!(chunk_narrations("").is_empty());
        assert!(chunk_reaction(" \n ").is_empty());
    }

    #[test]
    fn packs_up_to_max_len() {
        // Each sentence is 30 chars; two fit in 60.
        let sentence = format!("{}.", "a".repeat(29));
        let text = [sentence.as_str(); 4].join(" ");
        let chunks = chunk_narrations(&text);
        assert_eq!(chunks.len(), 2);
        assert_eq!(lens(&chunks), vec![61, 61]);
    }

    #[test]
    fn long_sentence_stands_alone() {
        let long = format!("{}。", "长".repeat(70));
        let text = format!("{long}短句一二三四五六七八九十一二三四五六七八九十一二三四五。");
        let chunks = chunk_narrations(&text);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], long);
    }

    #[test]
    fn short_chunks_merge_into_previous() {
        let long = format!("{}。", "长".repeat(59));
        let text = format!("{long}短。");
        let chunks = chunk_narrations(&text);
        assert_eq!(chunks, vec![format!("{long}短。")]);
    }

    #[test]
    fn leading_short_chunk_is_kept() {
        let long = format!("{}。", "长".repeat(59));
        let text = format!("短。{long}");
        let chunks = chunk_narrations(&text);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "短。");
    }

    #[test]
    fn reaction_merges_only_the_tail() {
        let long = format!("{}。", "长".repeat(59));
        let text = format!("短。{long}尾。");
        let chunks = chunk_reaction(&text);
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "短。");
        assert_eq!(chunks[1], format!("{long}尾。"));
    }

    #[test]
    fn single_short_reaction_is_kept() {
        assert_eq!(chunk_reaction("You feel brave."), vec!["You feel brave."]);
    }

    #[test]
    fn spans_tile_normalized_text() {
        let chunked = NarrationChunker::new(ChunkBounds::NARRATION.with_lengths(5, 12))
            .chunk_spans("One two. Three four! Five six? Seven.");
        let joined: String = chunked
            .spans
            .iter()
            .map(|s| &chunked.text[s.clone()])
            .collect();
        assert_eq!(joined, chunked.text);
        assert!(chunked.chunks().all(|c| !c.is_empty()));
    }
}
