use std::path::Path;

use colored::Colorize;

pub fn run(file: &Path, name: &str) -> miette::Result<()> {
    let doc = super::read_file(file)?;
    let section = sc_outline::section(&doc, name);
    if section.is_empty() {
        miette::bail!("no section matching \"{name}\" in {}", file.display());
    }

    println!("  {}", section.name.bold());
    println!();
    for line in section.text.lines() {
        println!("  {line}");
    }
    Ok(())
}
