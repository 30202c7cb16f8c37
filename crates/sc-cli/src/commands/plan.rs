use std::path::Path;

use comfy_table::{ContentArrangement, Table};

use sc_outline::parse_scene_plan;

pub fn run(file: &Path, json: bool) -> miette::Result<()> {
    let plan = parse_scene_plan(&super::read_file(file)?);
    if json {
        return super::print_json(&plan);
    }
    if plan.is_empty() {
        println!("  No scenes planned.");
        return Ok(());
    }

    let percentages = plan.percentages();
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Scene", "Range", "Ends at", "Prompt"]);
    for (index, (scene, end)) in plan.scenes.iter().zip(&percentages).enumerate() {
        table.add_row(vec![
            (index + 1).to_string(),
            scene.range.to_string(),
            format!("{end}%"),
            super::truncate(&scene.prompt, 60),
        ]);
    }

    println!("{table}");
    println!();
    let joined: Vec<String> = percentages.iter().map(u32::to_string).collect();
    println!("  Percentages: {}", joined.join(","));
    Ok(())
}
