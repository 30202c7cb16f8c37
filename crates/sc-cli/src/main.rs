//! CLI frontend for Storycraft.

mod commands;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "sc",
    about = "Storycraft: structure generated chapters and read planning documents",
    version,
    propagate_version = true
)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON configuration file with `parse` and `thresholds` settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a raw chapter into chapter JSON
    Parse {
        /// Raw chapter text file
        file: PathBuf,

        /// Scene end percentages, ascending and ending at 100
        #[arg(short, long, value_delimiter = ',', default_value = "100")]
        percentages: Vec<u32>,

        /// Take percentages from a scene plan file instead
        #[arg(long, conflicts_with = "percentages")]
        plan: Option<PathBuf>,

        /// Print a scene summary table instead of JSON
        #[arg(short, long)]
        summary: bool,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Report suspicious input in a raw chapter
    Check {
        /// Raw chapter text file
        file: PathBuf,

        /// Scene end percentages, ascending and ending at 100
        #[arg(short, long, value_delimiter = ',', default_value = "100")]
        percentages: Vec<u32>,
    },

    /// Compute attainable attribute ranges over a chapter history
    Ranges {
        /// Chapter files in play order (`.json` chapter documents or raw text)
        #[arg(required = true)]
        chapters: Vec<PathBuf>,

        /// Attribute-system document with initial values
        #[arg(short, long)]
        attributes: Option<PathBuf>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Resolve qualitative ending conditions into thresholds
    Conditions {
        /// Condition text, e.g. "courage high, wisdom low"
        #[arg(required_unless_present = "endings")]
        condition: Option<String>,

        /// Ending outline document; resolves every ending's condition
        #[arg(short, long)]
        endings: Option<PathBuf>,

        /// Chapter files in play order
        #[arg(short, long = "chapter")]
        chapters: Vec<PathBuf>,

        /// Attribute-system document with initial values
        #[arg(short, long)]
        attributes: Option<PathBuf>,

        /// Final attribute values (`name=value`), to pick the ending reached
        #[arg(short = 'f', long = "final", value_delimiter = ',')]
        finals: Vec<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print a named section of a planning document
    Section {
        /// Planning document
        file: PathBuf,

        /// Heading text to look for (case-insensitive substring)
        name: String,
    },

    /// Show the stage plan covering a chapter
    Stage {
        /// Architecture document
        file: PathBuf,

        /// Chapter number
        chapter: u32,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List or edit chapter outlines of a chapter directory
    Outline {
        /// Chapter directory document
        file: PathBuf,

        /// Show only this chapter's entry
        chapter: Option<u32>,

        /// Replace the chapter's outline in the file
        #[arg(long, requires = "chapter")]
        set: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Plan stages, emotional peaks and clusters for a story length
    Structure {
        /// Planned number of chapters
        chapters: u32,

        /// Genre tags, e.g. "romance,fantasy"
        #[arg(short, long = "tag", value_delimiter = ',')]
        tags: Vec<String>,

        /// Print the plan as an architecture outline
        #[arg(long, conflicts_with = "json")]
        markdown: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show a scene plan's percentages and image prompts
    Plan {
        /// Scene plan reply
        file: PathBuf,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Parse {
            file,
            percentages,
            plan,
            summary,
            output,
        } => commands::parse::run(
            &file,
            &percentages,
            plan.as_deref(),
            summary,
            output.as_deref(),
            &config,
        ),
        Commands::Check { file, percentages } => commands::check::run(&file, &percentages, &config),
        Commands::Ranges {
            chapters,
            attributes,
            json,
        } => commands::ranges::run(&chapters, attributes.as_deref(), json, &config),
        Commands::Conditions {
            condition,
            endings,
            chapters,
            attributes,
            finals,
            json,
        } => commands::conditions::run(
            commands::conditions::Args {
                condition: condition.as_deref(),
                endings: endings.as_deref(),
                chapters: &chapters,
                attributes: attributes.as_deref(),
                finals: &finals,
                json,
            },
            &config,
        ),
        Commands::Section { file, name } => commands::section::run(&file, &name),
        Commands::Stage {
            file,
            chapter,
            json,
        } => commands::stage::run(&file, chapter, json),
        Commands::Outline {
            file,
            chapter,
            set,
            json,
        } => commands::outline::run(&file, chapter, set.as_deref(), json),
        Commands::Structure {
            chapters,
            tags,
            markdown,
            json,
        } => commands::structure::run(chapters, &tags, markdown, json),
        Commands::Plan { file, json } => commands::plan::run(&file, json),
    }
}
