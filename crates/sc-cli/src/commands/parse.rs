use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use miette::{IntoDiagnostic, WrapErr};

use sc_core::ParsedChapter;
use sc_studio::StoryConfig;

pub fn run(
    file: &Path,
    percentages: &[u32],
    plan: Option<&Path>,
    summary: bool,
    output: Option<&Path>,
    config: &StoryConfig,
) -> miette::Result<()> {
    let percentages = match plan {
        Some(plan) => {
            let plan = sc_outline::parse_scene_plan(&super::read_file(plan)?);
            if plan.is_empty() {
                miette::bail!("scene plan has no scenes");
            }
            plan.percentages()
        }
        None => percentages.to_vec(),
    };
    super::check_percentages(&percentages)?;

    let raw = super::read_file(file)?;
    let chapter = sc_text::parse_chapter_with(&raw, &percentages, &config.parse);
    tracing::info!(
        chapter = chapter.chapter_index,
        scenes = chapter.scenes.len(),
        choices = chapter.choice_count(),
        "chapter parsed"
    );

    if summary {
        print_summary(&chapter);
        return Ok(());
    }

    let json = chapter.to_json_pretty().into_diagnostic()?;
    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .into_diagnostic()
                .wrap_err_with(|| format!("cannot write {}", path.display()))?;
            println!("  Wrote chapter {} to {}", chapter.chapter_index, path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn print_summary(chapter: &ParsedChapter) {
    println!(
        "  {} {}",
        format!("Chapter {}", chapter.chapter_index).bold(),
        chapter.title
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Scene", "Dialogues", "Choices", "Opening"]);

    for scene in &chapter.scenes {
        let choices: usize = scene
            .dialogues
            .iter()
            .filter_map(|dialogue| dialogue.choices())
            .map(<[_]>::len)
            .sum();
        let opening = scene
            .dialogues
            .first()
            .map_or_else(|| "-".to_string(), |d| super::truncate(&d.narration, 60));
        table.add_row(vec![
            scene.id.to_string(),
            scene.dialogues.len().to_string(),
            choices.to_string(),
            opening,
        ]);
    }

    println!("{table}");
    println!();
    let scenes = chapter.scenes.len();
    let choices = chapter.choice_count();
    println!(
        "  {} scene{}, {} choice{}",
        scenes,
        super::plural(scenes),
        choices,
        super::plural(choices)
    );
}
