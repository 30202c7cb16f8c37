//! Chapter and ending jobs over shared generators.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::task::JoinSet;
use tracing::{info, instrument};

use sc_balance::{ConditionResolver, calculate_ranges};
use sc_core::{AttributeMap, EndingCondition, ParsedChapter, RangeMap};
use sc_outline::EndingOutline;

use crate::config::StoryConfig;
use crate::error::{StudioError, StudioResult};
use crate::generator::{ImageGenerator, TextGenerator};
use crate::job::{GeneratedChapter, generate_chapter};
use crate::prompt::{ChapterBrief, ending_prompt, summary_prompt};

/// A generated chapter and the story summary updated with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterOutput {
    /// The generated chapter.
    pub generated: GeneratedChapter,
    /// Running summary including this chapter.
    pub story_summary: String,
}

/// Inputs for generating every ending of a story.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EndingRequest {
    /// Planned endings, in priority order.
    pub endings: Vec<EndingOutline>,
    /// Every chapter played so far.
    pub history: Vec<ParsedChapter>,
    /// Attribute values at the start of the story.
    pub initial_attributes: AttributeMap,
    /// Narrative architecture document.
    pub architecture: String,
    /// Raw text of the last chapter.
    pub last_chapter: String,
    /// Running summary of the story.
    pub story_summary: String,
}

/// One generated ending with its numeric trigger condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndingOutput {
    /// Position of the ending in the request, 0-based.
    pub ending_index: usize,
    /// Ending title from the outline.
    pub title: String,
    /// Trigger condition resolved against the story's attribute ranges.
    pub condition: EndingCondition,
    /// The generated ending.
    pub generated: GeneratedChapter,
}

/// Runs generation jobs against injected text and image generators.
///
/// Generators are blocking, so every job runs on tokio's blocking pool.
/// Ending jobs run concurrently, each owning its inputs and producing its
/// own output slot.
pub struct Studio<T, I> {
    text: Arc<T>,
    images: Arc<I>,
    config: Arc<StoryConfig>,
}

impl<T, I> Studio<T, I>
where
    T: TextGenerator + 'static,
    I: ImageGenerator + 'static,
{
    /// A studio with the default configuration.
    pub fn new(text: T, images: I) -> Self {
        Self {
            text: Arc::new(text),
            images: Arc::new(images),
            config: Arc::new(StoryConfig::default()),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: StoryConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &StoryConfig {
        &self.config
    }

    /// Generate, summarise, plan, and parse one chapter.
    #[instrument(skip_all, fields(chapter = brief.chapter_index))]
    pub async fn chapter(&self, brief: ChapterBrief) -> StudioResult<ChapterOutput> {
        let text = Arc::clone(&self.text);
        let images = Arc::clone(&self.images);
        let config = Arc::clone(&self.config);

        tokio::task::spawn_blocking(move || -> StudioResult<ChapterOutput> {
            let generated = generate_chapter(
                "chapter",
                brief.chapter_index,
                &brief.prompt(),
                text.as_ref(),
                images.as_ref(),
                &config,
            )?;
            let story_summary = text
                .generate(&summary_prompt(&brief.story_summary, &generated.raw_text))
                .map_err(StudioError::generate("summary"))?
                .trim()
                .to_string();
            Ok(ChapterOutput {
                generated,
                story_summary,
            })
        })
        .await?
    }

    /// Attribute ranges over the request's history.
    pub fn ranges(&self, request: &EndingRequest) -> RangeMap {
        calculate_ranges(&request.initial_attributes, &request.history)
    }

    /// Generate every ending concurrently.
    ///
    /// Each ending's qualitative condition is resolved against the ranges of
    /// the full history. Results come back in request order; the first
    /// failure aborts the batch.
    #[instrument(skip_all, fields(endings = request.endings.len()))]
    pub async fn endings(&self, request: EndingRequest) -> StudioResult<Vec<EndingOutput>> {
        let ranges = self.ranges(&request);
        let resolver = ConditionResolver::new(self.config.thresholds);
        let chapter = request.history.len() as u32 + 1;

        let mut jobs = JoinSet::new();
        for (ending_index, ending) in request.endings.into_iter().enumerate() {
            let condition = resolver.resolve(&ending.condition, &ranges);
            let prompt = ending_prompt(
                &ending,
                &request.architecture,
                &request.last_chapter,
                &request.story_summary,
            );
            let text = Arc::clone(&self.text);
            let images = Arc::clone(&self.images);
            let config = Arc::clone(&self.config);

            jobs.spawn_blocking(move || {
                let generated = generate_chapter(
                    "ending",
                    chapter,
                    &prompt,
                    text.as_ref(),
                    images.as_ref(),
                    &config,
                )?;
                Ok::<_, StudioError>(EndingOutput {
                    ending_index,
                    title: ending.title,
                    condition,
                    generated,
                })
            });
        }

        let mut slots: Vec<Option<EndingOutput>> = Vec::new();
        slots.resize_with(jobs.len(), || None);
        while let Some(joined) = jobs.join_next().await {
            let output = joined??;
            let index = output.ending_index;
            slots[index] = Some(output);
        }

        let outputs: Vec<EndingOutput> = slots.into_iter().flatten().collect();
        info!(generated = outputs.len(), "endings finished");
        Ok(outputs)
    }
}
