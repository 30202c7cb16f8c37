//! Chapter text parser for Storycraft.
//!
//! Turns free-form generated chapter text into a [`ParsedChapter`]: the
//! header is read and stripped, the body is cut into scenes at approximate
//! percentages without ever splitting a choice group, and each scene is
//! assembled from narration chunks and choice groups.
//!
//! Parsing never fails. Input the parser had to guess about is reported by
//! [`lint::lint_chapter`] as [`Diagnostic`]s instead.

/// Chapter assembly from header, scenes, narration, and choice groups.
pub mod assemble;
/// Choice-line recognition and the choice-group scanner.
pub mod choice;
/// Sentence chunking for display.
pub mod chunker;
/// Parser configuration.
pub mod config;
/// Diagnostics and their terminal rendering.
pub mod diagnostics;
/// Effect-annotation parsing.
pub mod effect;
/// Chapter header lines.
pub mod header;
/// Line and effect tokenizers.
pub mod lexer;
/// Lint checks over raw chapter text.
pub mod lint;
/// Sentence segmentation.
pub mod sentence;
/// Safe percentage-based scene splitting.
pub mod split;

use sc_core::ParsedChapter;

pub use assemble::ChapterAssembler;
pub use choice::{ChoiceGroupScanner, parse_choice_line, scan_choice_groups};
pub use chunker::{NarrationChunker, chunk_narrations, chunk_reaction};
pub use config::{ChunkBounds, MergeShort, ParseConfig};
pub use diagnostics::{Diagnostic, Severity, render_diagnostics};
pub use effect::parse_deltas;
pub use header::{ChapterHeader, extract_header, strip_headers};
pub use sentence::{SentenceSplitter, normalize, split_sentences};
pub use split::{SafeRangeSplitter, split_by_ranges};

/// Parse a raw chapter into scenes cut at `percentages`, with default settings.
pub fn parse_chapter(raw: &str, percentages: &[u32]) -> ParsedChapter {
    parse_chapter_with(raw, percentages, &ParseConfig::default())
}

/// Parse a raw chapter into scenes cut at `percentages`.
pub fn parse_chapter_with(raw: &str, percentages: &[u32], config: &ParseConfig) -> ParsedChapter {
    ChapterAssembler::new(config).assemble(raw, percentages)
}
