//! The generate-then-parse pipeline shared by chapter and ending jobs.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span, warn};
use uuid::Uuid;

use sc_core::ParsedChapter;
use sc_outline::parse_scene_plan;

use crate::config::StoryConfig;
use crate::error::{StudioError, StudioResult};
use crate::generator::{ImageGenerator, TextGenerator};
use crate::prompt::scene_plan_prompt;

/// A chapter (or ending) produced by one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedChapter {
    /// Identifier of the job that produced it.
    pub job_id: Uuid,
    /// When generation finished.
    pub generated_at: DateTime<Utc>,
    /// The generator's raw reply.
    pub raw_text: String,
    /// Scene end percentages the chapter was split at.
    pub percentages: Vec<u32>,
    /// The parsed chapter.
    pub chapter: ParsedChapter,
    /// One image reference per scene, placeholders included.
    pub scene_images: Vec<String>,
}

impl GeneratedChapter {
    /// Number of scenes.
    pub fn scene_count(&self) -> usize {
        self.chapter.scenes.len()
    }
}

/// Pair every scene with an image reference, filling gaps with the
/// placeholder.
fn scene_images(generated: Vec<String>, scenes: usize, placeholder: &str) -> Vec<String> {
    let mut generated = generated.into_iter();
    (0..scenes)
        .map(|_| generated.next().unwrap_or_else(|| placeholder.to_string()))
        .collect()
}

/// Turn generated text into a parsed chapter with scene images.
///
/// The scene plan is requested from `text_gen` and parsed; its percentages
/// drive the scene split. A failed plan or image request falls back to a
/// single unsplit scene or placeholder images respectively.
pub(crate) fn parse_generated<T, I>(
    job_id: Uuid,
    raw_text: String,
    text_gen: &T,
    image_gen: &I,
    config: &StoryConfig,
) -> GeneratedChapter
where
    T: TextGenerator + ?Sized,
    I: ImageGenerator + ?Sized,
{
    let plan = match text_gen.generate(&scene_plan_prompt(&raw_text)) {
        Ok(reply) => parse_scene_plan(&reply),
        Err(err) => {
            warn!(%job_id, error = %err, "scene plan request failed, keeping one scene");
            Default::default()
        }
    };
    let percentages = plan.percentages();
    debug!(%job_id, ?percentages, "scene plan parsed");

    let chapter = sc_text::parse_chapter_with(&raw_text, &percentages, &config.parse);

    let generated = if plan.is_empty() {
        Vec::new()
    } else {
        image_gen.generate_scenes(&plan.prompts()).unwrap_or_else(|err| {
            warn!(%job_id, error = %err, "scene images failed, using placeholders");
            Vec::new()
        })
    };
    let scene_images = scene_images(generated, chapter.scenes.len(), &config.placeholder_image);

    GeneratedChapter {
        job_id,
        generated_at: Utc::now(),
        raw_text,
        percentages,
        chapter,
        scene_images,
    }
}

/// Generate text for `prompt`, then parse it into a chapter.
///
/// `chapter` is only used for logging and error reporting.
pub(crate) fn generate_chapter<T, I>(
    stage: &'static str,
    chapter: u32,
    prompt: &str,
    text_gen: &T,
    image_gen: &I,
    config: &StoryConfig,
) -> StudioResult<GeneratedChapter>
where
    T: TextGenerator + ?Sized,
    I: ImageGenerator + ?Sized,
{
    let job_id = Uuid::new_v4();
    let span = info_span!("job", %job_id, stage, chapter);
    let _guard = span.enter();
    let started = Instant::now();

    let raw_text = text_gen
        .generate(prompt)
        .map_err(StudioError::generate(stage))?;
    if sc_text::strip_headers(&raw_text).is_empty() {
        return Err(StudioError::EmptyChapter { chapter });
    }

    let generated = parse_generated(job_id, raw_text, text_gen, image_gen, config);
    info!(
        scenes = generated.scene_count(),
        choices = generated.chapter.choice_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "job finished"
    );
    Ok(generated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_images_become_placeholders() {
        let images = scene_images(vec!["a".to_string()], 3, "p");
        assert_eq!(images, vec!["a", "p", "p"]);
        let images = scene_images(vec!["a".to_string(), "b".to_string()], 1, "p");
        assert_eq!(images, vec!["a"]);
    }
}
