//! Tunable limits for the chapter parser.

use serde::{Deserialize, Serialize};

/// Which short chunks the second chunking pass folds into their predecessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeShort {
    /// Every chunk shorter than `min_len` merges into the previous one.
    Any,
    /// Only a short final chunk merges, and only if there are at least two chunks.
    TrailingOnly,
}

/// Length bounds for packing sentences into chunks, in `char`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChunkBounds {
    /// Chunks shorter than this are merged during the second pass.
    pub min_len: usize,
    /// Sentences are packed while the buffer stays within this length.
    pub max_len: usize,
    /// Second-pass merge rule.
    pub merge: MergeShort,
}

impl ChunkBounds {
    /// Bounds for main narration (25–60, merge every short chunk).
    pub const NARRATION: ChunkBounds = ChunkBounds {
        min_len: 25,
        max_len: 60,
        merge: MergeShort::Any,
    };

    /// Bounds for choice reactions (25–60, merge only a short tail).
    pub const REACTION: ChunkBounds = ChunkBounds {
        min_len: 25,
        max_len: 60,
        merge: MergeShort::TrailingOnly,
    };

    /// Set the length bounds, keeping the merge rule.
    pub fn with_lengths(mut self, min_len: usize, max_len: usize) -> Self {
        self.min_len = min_len;
        self.max_len = max_len.max(1);
        self
    }
}

impl Default for ChunkBounds {
    fn default() -> Self {
        Self::NARRATION
    }
}

/// Configuration for parsing one raw chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseConfig {
    /// Bounds for narration chunks.
    pub narration: ChunkBounds,
    /// Bounds for reaction chunks.
    pub reaction: ChunkBounds,
    /// Buffer length (in `char`s) past which a sentence is emitted at the next
    /// candidate boundary even if its quotes are unbalanced.
    pub sentence_cap: usize,
    /// Half-width (in `char`s) of the window searched for a safe scene cut.
    pub split_window: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            narration: ChunkBounds::NARRATION,
            reaction: ChunkBounds::REACTION,
            sentence_cap: 80,
            split_window: 200,
        }
    }
}

impl ParseConfig {
    /// Set the narration chunk bounds.
    pub fn with_narration(mut self, bounds: ChunkBounds) -> Self {
        self.narration = bounds;
        self
    }

    /// Set the reaction chunk bounds.
    pub fn with_reaction(mut self, bounds: ChunkBounds) -> Self {
        self.reaction = bounds;
        self
    }

    /// Set the forced sentence split length (at least 1).
    pub fn with_sentence_cap(mut self, cap: usize) -> Self {
        self.sentence_cap = cap.max(1);
        self
    }

    /// Set the safe-cut search window.
    pub fn with_split_window(mut self, window: usize) -> Self {
        self.split_window = window;
        self
    }
}
