use comfy_table::{ContentArrangement, Table};

use sc_outline::plan_structure;

pub fn run(chapters: u32, tags: &[String], markdown: bool, json: bool) -> miette::Result<()> {
    if chapters == 0 {
        miette::bail!("a story needs at least one chapter");
    }
    let structure = plan_structure(chapters, tags);
    if json {
        return super::print_json(&structure);
    }
    if markdown {
        print!("{}", structure.to_markdown());
        return Ok(());
    }

    println!(
        "  {} chapter{}: {} ({})",
        chapters,
        super::plural(chapters as usize),
        structure.scale.label(),
        structure.scale.description()
    );
    println!();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Stage", "Chapters", "Goal", "Tone"]);
    for stage in &structure.stages {
        let span = if stage.start == stage.end {
            stage.start.to_string()
        } else {
            format!("{}-{}", stage.start, stage.end)
        };
        table.add_row(vec![stage.name.clone(), span, stage.goal.clone(), stage.tone.clone()]);
    }
    println!("{table}");
    println!();

    let peaks: Vec<String> = structure.emotional_peaks.iter().map(u32::to_string).collect();
    println!("  Emotional peaks: {}", peaks.join(", "));
    let clusters: Vec<String> = structure
        .clusters
        .iter()
        .map(|(start, end)| format!("{start}-{end}"))
        .collect();
    println!("  Clusters: {}", clusters.join(", "));
    Ok(())
}
