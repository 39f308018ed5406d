use anyhow::{Context, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, id: &str, format: &OutputFormat) -> Result<()> {
    let word = app.find_word(id)?;
    let deleted = app
        .wordbook
        .delete_word(&word.id)
        .context("Failed to delete word")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": word.id,
                "term": word.term,
                "deleted": deleted,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if deleted {
                println!("Deleted {} ({})", word.term, word.id);
            } else {
                println!("{} was already gone", word.id);
            }
        }
    }

    Ok(())
}
