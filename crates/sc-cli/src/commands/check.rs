use std::path::Path;

use sc_studio::StoryConfig;
use sc_text::lint::lint_chapter;
use sc_text::{Severity, render_diagnostics};

pub fn run(file: &Path, percentages: &[u32], config: &StoryConfig) -> miette::Result<()> {
    super::check_percentages(percentages)?;
    let raw = super::read_file(file)?;
    let diagnostics = lint_chapter(&raw, percentages, &config.parse);

    if !diagnostics.is_empty() {
        let filename = file.display().to_string();
        eprint!("{}", render_diagnostics(&raw, &filename, &diagnostics));
    }

    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count();
    let warnings = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();

    if errors > 0 {
        eprintln!(
            "  {} error{}, {} warning{}",
            errors,
            super::plural(errors),
            warnings,
            super::plural(warnings),
        );
        miette::bail!("check failed with errors");
    }
    if warnings > 0 {
        eprintln!("  {} warning{}", warnings, super::plural(warnings));
    }

    let chapter = sc_text::parse_chapter_with(&raw, percentages, &config.parse);
    println!("  All checks passed for chapter {}.", chapter.chapter_index);
    println!(
        "  {} scenes, {} choices",
        chapter.scenes.len(),
        chapter.choice_count()
    );
    Ok(())
}
