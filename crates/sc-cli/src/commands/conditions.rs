use std::path::{Path, PathBuf};

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use miette::{IntoDiagnostic, WrapErr};
use serde::Serialize;

use sc_balance::{ConditionResolver, attribute_scores, calculate_ranges, select_ending};
use sc_core::{AttributeMap, EndingCondition, RangeMap};
use sc_outline::parse_endings;
use sc_studio::StoryConfig;

/// Arguments of `sc conditions`.
pub struct Args<'a> {
    pub condition: Option<&'a str>,
    pub endings: Option<&'a Path>,
    pub chapters: &'a [PathBuf],
    pub attributes: Option<&'a Path>,
    pub finals: &'a [String],
    pub json: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Resolved {
    title: String,
    text: String,
    condition: EndingCondition,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Outcome {
    ending_index: usize,
    title: String,
    scores: std::collections::BTreeMap<String, u32>,
}

#[derive(Serialize)]
struct Report<'a> {
    ranges: &'a RangeMap,
    conditions: &'a [Resolved],
    #[serde(skip_serializing_if = "Option::is_none")]
    outcome: Option<Outcome>,
}

pub fn run(args: Args<'_>, config: &StoryConfig) -> miette::Result<()> {
    let initial = super::load_attributes(args.attributes)?;
    let history = super::load_chapters(args.chapters, config)?;
    let ranges = calculate_ranges(&initial, &history);
    let resolver = ConditionResolver::new(config.thresholds);

    let resolved: Vec<Resolved> = match args.endings {
        Some(path) => {
            let endings = parse_endings(&super::read_file(path)?);
            if endings.is_empty() {
                miette::bail!("no endings found in {}", path.display());
            }
            endings
                .into_iter()
                .map(|ending| Resolved {
                    condition: resolver.resolve(&ending.condition, &ranges),
                    title: ending.title,
                    text: ending.condition,
                })
                .collect()
        }
        None => {
            let text = args.condition.unwrap_or_default();
            vec![Resolved {
                title: "condition".to_string(),
                text: text.to_string(),
                condition: resolver.resolve(text, &ranges),
            }]
        }
    };

    let outcome = if args.finals.is_empty() {
        None
    } else {
        let finals = parse_finals(args.finals)?;
        let conditions: Vec<EndingCondition> =
            resolved.iter().map(|r| r.condition.clone()).collect();
        select_ending(&conditions, &finals).map(|index| Outcome {
            ending_index: index,
            title: resolved[index].title.clone(),
            scores: attribute_scores(&finals, &ranges),
        })
    };

    if args.json {
        return super::print_json(&Report {
            ranges: &ranges,
            conditions: &resolved,
            outcome,
        });
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Ending", "Condition", "Thresholds"]);
    for entry in &resolved {
        let thresholds = if entry.condition.is_empty() {
            "-".to_string()
        } else {
            entry
                .condition
                .thresholds
                .iter()
                .map(|(name, threshold)| format!("{name} {threshold}"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        table.add_row(vec![
            entry.title.clone(),
            super::truncate(&entry.text, 60),
            thresholds,
        ]);
    }
    println!("{table}");

    if let Some(outcome) = outcome {
        println!();
        println!(
            "  {} {} (ending {})",
            "Reached:".bold(),
            outcome.title,
            outcome.ending_index + 1
        );
        for (name, score) in &outcome.scores {
            println!("    {name}: {score}/100");
        }
    }

    let unresolved = resolved.iter().filter(|r| r.condition.is_empty()).count();
    if unresolved > 0 {
        println!();
        println!(
            "  {}",
            format!(
                "{} condition{} matched no known attribute",
                unresolved,
                super::plural(unresolved)
            )
            .dimmed()
        );
    }
    Ok(())
}

/// Parse `name=value` pairs into final attribute values.
fn parse_finals(pairs: &[String]) -> miette::Result<AttributeMap> {
    pairs
        .iter()
        .map(|pair| -> miette::Result<(String, i64)> {
            let (name, value) = pair
                .split_once('=')
                .ok_or_else(|| miette::miette!("expected name=value, got \"{pair}\""))?;
            let value: i64 = value
                .trim()
                .parse()
                .into_diagnostic()
                .wrap_err_with(|| format!("invalid value for \"{}\"", name.trim()))?;
            Ok((name.trim().to_string(), value))
        })
        .collect()
}
