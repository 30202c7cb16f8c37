use std::path::{Path, PathBuf};

use comfy_table::{ContentArrangement, Table};

use sc_balance::calculate_ranges;
use sc_studio::StoryConfig;

pub fn run(
    chapters: &[PathBuf],
    attributes: Option<&Path>,
    json: bool,
    config: &StoryConfig,
) -> miette::Result<()> {
    let initial = super::load_attributes(attributes)?;
    let history = super::load_chapters(chapters, config)?;
    let ranges = calculate_ranges(&initial, &history);

    if json {
        return super::print_json(&ranges);
    }

    if ranges.is_empty() {
        println!("  No attributes found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Attribute", "Min", "Max", "Span"]);
    for (name, range) in &ranges {
        table.add_row(vec![
            name.clone(),
            range.min.to_string(),
            range.max.to_string(),
            range.span().to_string(),
        ]);
    }

    println!("{table}");
    println!();
    let decisions: usize = history
        .iter()
        .map(|chapter| chapter.decision_points().count())
        .sum();
    println!(
        "  {} attribute{} over {} chapter{}, {} decision point{}",
        ranges.len(),
        super::plural(ranges.len()),
        history.len(),
        super::plural(history.len()),
        decisions,
        super::plural(decisions),
    );
    Ok(())
}
