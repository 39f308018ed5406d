use anyhow::{anyhow, Context, Result};

use wordbook_lib::words::WordUpdate;

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub fn run(app: &App, id: &str, update: WordUpdate, format: &OutputFormat, use_color: bool) -> Result<()> {
    let word = app.find_word(id)?;

    let updated = app
        .wordbook
        .update_word(&word.id, update)
        .context("Failed to update word")?
        .ok_or_else(|| anyhow!("Word {} no longer exists", word.id))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&updated)?);
        }
        OutputFormat::Plain => {
            println!("Updated {}", terminal::word_line(&updated, use_color));
        }
    }

    Ok(())
}
