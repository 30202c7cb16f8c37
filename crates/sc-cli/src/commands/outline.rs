use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use miette::{IntoDiagnostic, WrapErr};

use sc_outline::{chapter_outline, parse_chapter_directory, replace_outline};

pub fn run(file: &Path, chapter: Option<u32>, set: Option<&str>, json: bool) -> miette::Result<()> {
    let doc = super::read_file(file)?;

    let Some(chapter) = chapter else {
        return list(&doc, json);
    };

    if let Some(outline) = set {
        let Some(updated) = replace_outline(&doc, chapter, outline) else {
            miette::bail!(
                "chapter {chapter} has no outline field in {}",
                file.display()
            );
        };
        std::fs::write(file, updated)
            .into_diagnostic()
            .wrap_err_with(|| format!("cannot write {}", file.display()))?;
        tracing::info!(chapter, path = %file.display(), "outline replaced");
        println!("  Updated outline of chapter {chapter}.");
        return Ok(());
    }

    let Some(entry) = chapter_outline(&doc, chapter) else {
        miette::bail!("chapter {chapter} not found in {}", file.display());
    };
    if json {
        return super::print_json(&entry);
    }
    println!("  {}", format!("{}. {}", entry.chapter_index, entry.title).bold());
    println!();
    for line in entry.outline.lines() {
        println!("  {line}");
    }
    Ok(())
}

fn list(doc: &str, json: bool) -> miette::Result<()> {
    let entries = parse_chapter_directory(doc);
    if json {
        return super::print_json(&entries);
    }
    if entries.is_empty() {
        println!("  No chapters found.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Title", "Outline"]);
    for entry in &entries {
        table.add_row(vec![
            entry.chapter_index.to_string(),
            entry.title.clone(),
            super::truncate(&entry.outline, 60),
        ]);
    }

    println!("{table}");
    println!();
    println!(
        "  {} chapter{}",
        entries.len(),
        super::plural(entries.len())
    );
    Ok(())
}
