//! Generation jobs for Storycraft.
//!
//! The parsing crates never talk to a model. This crate does: a [`Studio`]
//! owns an injected [`TextGenerator`] and [`ImageGenerator`], asks them for
//! chapter text, summaries, scene plans, and images, and hands the text to
//! the parser. Ending jobs run concurrently on tokio's blocking pool.
//!
//! Jobs log through `tracing` (job id, chapter, scene count, duration); the
//! binary decides where the events go.

/// Shared configuration.
pub mod config;
/// Error types.
pub mod error;
/// Text and image generator traits.
pub mod generator;
/// The generate-then-parse pipeline.
pub mod job;
/// Prompt construction.
pub mod prompt;
/// The job runner.
pub mod studio;

pub use config::{PLACEHOLDER_IMAGE, StoryConfig};
pub use error::{GenerateError, StudioError, StudioResult};
pub use generator::{ImageGenerator, NoImages, TextGenerator};
pub use job::GeneratedChapter;
pub use prompt::{ChapterBrief, ending_prompt, scene_plan_prompt, summary_prompt};
pub use studio::{ChapterOutput, EndingOutput, EndingRequest, Studio};
