use anyhow::{Context, Result};
use chrono::Utc;

use wordbook_lib::words::MasteryTag;

use crate::app::App;
use crate::render::terminal;
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let summary = app
        .wordbook
        .summary(Utc::now())
        .context("Failed to compute statistics")?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Plain => {
            if let Ok(path) = app.config.store_path() {
                println!("Notebook: {}", path.display());
            }
            println!("Words:    {}", summary.total_words);
            println!("Due:      {}", summary.due_words);
            println!("Reviews:  {}", summary.total_reviews);
            println!("Lapses:   {}", summary.total_lapses);
            println!();

            for tag in MasteryTag::ALL {
                println!(
                    "{:>6}  {}",
                    summary.by_tag.get(tag),
                    terminal::render_tag(tag, use_color)
                );
            }
        }
    }

    Ok(())
}
