pub mod check;
pub mod conditions;
pub mod outline;
pub mod parse;
pub mod plan;
pub mod ranges;
pub mod section;
pub mod stage;
pub mod structure;

use std::path::Path;

use miette::{IntoDiagnostic, WrapErr, bail};
use serde::Serialize;

use sc_core::{AttributeMap, ParsedChapter};
use sc_studio::StoryConfig;

/// Read a whole file as UTF-8.
fn read_file(path: &Path) -> miette::Result<String> {
    std::fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("cannot read {}", path.display()))
}

/// Load the configuration file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> miette::Result<StoryConfig> {
    let Some(path) = path else {
        return Ok(StoryConfig::default());
    };
    let text = read_file(path)?;
    let config = StoryConfig::from_json(&text)
        .into_diagnostic()
        .wrap_err_with(|| format!("invalid config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Reject percentage lists the splitter would have to repair.
fn check_percentages(percentages: &[u32]) -> miette::Result<()> {
    if percentages.windows(2).any(|pair| pair[0] > pair[1]) {
        bail!("percentages must be ascending: {percentages:?}");
    }
    if percentages.last() != Some(&100) {
        bail!("percentages must end at 100: {percentages:?}");
    }
    Ok(())
}

/// Load a chapter: `.json` files are chapter documents, anything else is
/// raw text parsed as a single scene.
fn load_chapter(path: &Path, config: &StoryConfig) -> miette::Result<ParsedChapter> {
    let text = read_file(path)?;
    if path.extension().is_some_and(|ext| ext == "json") {
        ParsedChapter::from_json(&text)
            .into_diagnostic()
            .wrap_err_with(|| format!("invalid chapter document {}", path.display()))
    } else {
        Ok(sc_text::parse_chapter_with(&text, &[100], &config.parse))
    }
}

fn load_chapters(paths: &[impl AsRef<Path>], config: &StoryConfig) -> miette::Result<Vec<ParsedChapter>> {
    paths
        .iter()
        .map(|path| load_chapter(path.as_ref(), config))
        .collect()
}

/// Initial attribute values from an attribute-system document.
fn load_attributes(path: Option<&Path>) -> miette::Result<AttributeMap> {
    match path {
        Some(path) => Ok(sc_outline::parse_initial_attributes(&read_file(path)?)),
        None => Ok(AttributeMap::new()),
    }
}

fn to_json<T: Serialize>(value: &T) -> miette::Result<String> {
    serde_json::to_string_pretty(value).into_diagnostic()
}

fn print_json<T: Serialize>(value: &T) -> miette::Result<()> {
    println!("{}", to_json(value)?);
    Ok(())
}

/// Shorten `text` to `max` characters, marking the cut with "...".
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let kept: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        text.to_string()
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "" } else { "s" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentages_must_ascend_to_100() {
        assert!(check_percentages(&[30, 60, 100]).is_ok());
        assert!(check_percentages(&[100]).is_ok());
        assert!(check_percentages(&[60, 30, 100]).is_err());
        assert!(check_percentages(&[30, 60]).is_err());
        assert!(check_percentages(&[]).is_err());
    }

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("一二三四五六", 5), "一二...");
    }
}
