use anyhow::{anyhow, Context, Result};
use chrono::Utc;

use wordbook_lib::words::{format_interval, Grade};

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run(app: &App, id: &str, grade: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let grade: Grade = grade.parse()?;
    let word = app.find_word(id)?;

    let reviewed = app
        .wordbook
        .review_word(&word.id, grade.quality(), Utc::now())
        .context("Failed to record review")?
        .ok_or_else(|| anyhow!("Word {} was deleted before the review was saved", word.id))?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&reviewed)?);
        }
        OutputFormat::Plain => {
            println!(
                "{}: {}",
                terminal::paint(&reviewed.term, Color::BOLD, use_color),
                grade.feedback()
            );
            println!(
                "  Next review in {} ({})",
                format_interval(reviewed.schedule.interval),
                reviewed.schedule.next_review.format("%Y-%m-%d %H:%M")
            );
            println!(
                "  Mastery: {} (score {})",
                terminal::render_tag(reviewed.mastery.mastery_tag, use_color),
                reviewed.mastery.mastery_score
            );
        }
    }

    Ok(())
}
