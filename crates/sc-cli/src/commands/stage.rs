use std::path::Path;

use colored::Colorize;

use sc_outline::{cluster_for_chapter, stage_section};

pub fn run(file: &Path, chapter: u32, json: bool) -> miette::Result<()> {
    let doc = super::read_file(file)?;
    let section = stage_section(&doc, chapter);

    if json {
        return super::print_json(&section);
    }

    if section.is_empty() {
        println!(
            "  {}",
            format!("No stage covers chapter {chapter}; showing fallbacks.").dimmed()
        );
        println!();
    }

    let Some(stage) = section.fields else {
        return Ok(());
    };
    let cluster = cluster_for_chapter(&doc, chapter);

    println!(
        "  {} (chapters {}-{})",
        stage.stage_name.bold(),
        stage.start_chapter,
        stage.end_chapter
    );
    println!();
    println!("  {}  {}", "Goal:".dimmed(), stage.goal);
    println!("  {}  {}", "Tone:".dimmed(), stage.tone);
    println!("  {}  {}", "Focus:".dimmed(), stage.focus_attributes);
    println!("  {}  {}", "Characters:".dimmed(), stage.character_interactions);
    println!("  {}", "Tasks:".dimmed());
    for task in &stage.tasks {
        println!("    - {task}");
    }
    println!(
        "  {}  {} (theme: {}; choice weight: {})",
        "Cluster:".dimmed(),
        cluster.name,
        if cluster.emotional_theme.is_empty() {
            "-"
        } else {
            cluster.emotional_theme.as_str()
        },
        cluster.choice_weight
    );
    Ok(())
}
