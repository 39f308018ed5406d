use anyhow::{Context, Result};
use chrono::Utc;

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let due = app
        .wordbook
        .due_words(Utc::now())
        .context("Failed to get due words")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&due)?);
        }
        OutputFormat::Plain => {
            if due.is_empty() {
                println!("Nothing to review.");
                return Ok(());
            }

            for word in &due {
                println!("{}", terminal::word_line(word, use_color));
                if !word.context.is_empty() {
                    println!("          {}", word.context);
                }
            }

            println!("\n{} words due", due.len());
        }
    }

    Ok(())
}
