use anyhow::{Context, Result};

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub fn run(app: &App, query: Option<&str>, format: &OutputFormat, use_color: bool) -> Result<()> {
    let words = match query {
        Some(query) => app.wordbook.search(query),
        None => app.wordbook.list_words(),
    }
    .context("Failed to list words")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&words)?);
        }
        OutputFormat::Plain => {
            if words.is_empty() {
                println!("No words found.");
                return Ok(());
            }

            for word in &words {
                println!("{}", terminal::word_line(word, use_color));
            }

            println!("\n{} words", words.len());
        }
    }

    Ok(())
}
