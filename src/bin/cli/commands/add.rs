use anyhow::{Context, Result};
use chrono::Utc;

use wordbook_lib::words::WordDraft;

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub async fn run(app: &App, draft: WordDraft, format: &OutputFormat, use_color: bool) -> Result<()> {
    let word = app
        .wordbook
        .save_word(draft, Utc::now())
        .await
        .context("Failed to save word")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&word)?);
        }
        OutputFormat::Plain => {
            println!(
                "Saved {} ({})",
                terminal::paint(&word.term, Color::BOLD, use_color),
                word.id
            );
            if word.note.is_empty() {
                println!("  (no translation available)");
            } else {
                println!("  {}", word.note);
            }
            if !word.phonetic.is_empty() {
                println!("  {}", terminal::paint(&word.phonetic, Color::DIM, use_color));
            }
        }
    }

    Ok(())
}
