mod app;
mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "wordbook-cli", about = "Vocabulary notebook with spaced-repetition review", version)]
struct Cli {
    /// Config file (default: <config dir>/wordbook/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    /// Disable ANSI colors
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Save a word, translating it when possible
    Add {
        /// The selected term
        term: String,
        /// Sentence the term was found in
        #[arg(long, default_value = "")]
        context: String,
        /// Page the term was found on
        #[arg(long, default_value = "")]
        source: String,
        /// Language code (detected from the term when omitted)
        #[arg(long)]
        lang: Option<String>,
        /// Translation to use when no lookup result is available
        #[arg(long)]
        note: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },

    /// List saved words, newest first
    List {
        /// Only words whose term, context or note contains this text
        #[arg(long)]
        query: Option<String>,
    },

    /// List words due for review
    Due,

    /// Review a word
    Review {
        /// Word ID (unique prefix accepted)
        id: String,
        /// again, hard, good, easy, or a quality 0-5
        grade: String,
    },

    /// Show the interval each grade would give
    Preview {
        /// Word ID (unique prefix accepted)
        id: String,
    },

    /// Show a word in full
    Show {
        /// Word ID (unique prefix accepted)
        id: String,
    },

    /// Edit a word's translation, definition or tags
    Edit {
        /// Word ID (unique prefix accepted)
        id: String,
        #[arg(long)]
        note: Option<String>,
        #[arg(long)]
        definition: Option<String>,
        #[arg(long)]
        phonetic: Option<String>,
        #[arg(long)]
        context: Option<String>,
        /// Replace the examples (repeatable)
        #[arg(long = "example")]
        examples: Vec<String>,
        /// Replace the tags (comma-separated)
        #[arg(long)]
        tags: Option<String>,
    },

    /// Delete a word
    Delete {
        /// Word ID (unique prefix accepted)
        id: String,
    },

    /// Show notebook statistics
    Stats,

    /// Backfill mastery fields on words saved by older versions
    Migrate,
}

/// Split a comma-separated list, dropping blanks
fn parse_tags(tags: Option<&str>) -> Option<Vec<String>> {
    tags.map(|t| {
        t.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let use_color = !cli.no_color && atty_check();
    let format = &cli.format;

    let config = cli.config.as_deref();

    match cli.command {
        Command::Add { term, context, source, lang, note, tags } => {
            let app = app::App::new(config)?;
            let draft = wordbook_lib::words::WordDraft {
                term,
                lang,
                context,
                source_url: source,
                note,
                tags: parse_tags(tags.as_deref()).unwrap_or_default(),
            };
            commands::add::run(&app, draft, format, use_color).await?;
        }
        Command::List { query } => {
            let app = app::App::new(config)?;
            commands::list::run(&app, query.as_deref(), format, use_color)?;
        }
        Command::Due => {
            let app = app::App::new(config)?;
            commands::due::run(&app, format, use_color)?;
        }
        Command::Review { id, grade } => {
            let app = app::App::new(config)?;
            commands::review::run(&app, &id, &grade, format, use_color)?;
        }
        Command::Preview { id } => {
            let app = app::App::new(config)?;
            commands::preview::run(&app, &id, format)?;
        }
        Command::Show { id } => {
            let app = app::App::new(config)?;
            commands::show::run(&app, &id, format, use_color)?;
        }
        Command::Edit { id, note, definition, phonetic, context, examples, tags } => {
            let app = app::App::new(config)?;
            let update = wordbook_lib::words::WordUpdate {
                note,
                definition,
                examples: if examples.is_empty() { None } else { Some(examples) },
                phonetic,
                context,
                tags: parse_tags(tags.as_deref()),
            };
            commands::edit::run(&app, &id, update, format, use_color)?;
        }
        Command::Delete { id } => {
            let app = app::App::new(config)?;
            commands::delete::run(&app, &id, format)?;
        }
        Command::Stats => {
            let app = app::App::new(config)?;
            commands::stats::run(&app, format, use_color)?;
        }
        Command::Migrate => {
            // Runs on the raw store; opening the notebook would migrate implicitly
            commands::migrate::run(config, format)?;
        }
    }

    Ok(())
}

/// Check if stdout is a terminal (for color support)
fn atty_check() -> bool {
    unsafe { libc_isatty(1) != 0 }
}

extern "C" {
    #[link_name = "isatty"]
    fn libc_isatty(fd: i32) -> i32;
}
