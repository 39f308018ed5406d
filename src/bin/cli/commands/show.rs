use anyhow::Result;

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run(app: &App, id: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let word = app.find_word(id)?;

    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(&word)?);
        return Ok(());
    }

    // Print header
    let mut header = terminal::paint(&word.term, Color::BOLD, use_color);
    if !word.phonetic.is_empty() {
        header.push_str(&format!("  {}", word.phonetic));
    }
    println!("{}", header);
    println!("{}", terminal::paint(&word.id, Color::DIM, use_color));

    if !word.tags.is_empty() {
        let tags = word.tags.iter()
            .map(|t| format!("#{}", t))
            .collect::<Vec<_>>()
            .join(" ");
        println!("{}", terminal::paint(&tags, Color::DIM, use_color));
    }

    println!();
    if !word.note.is_empty() {
        println!("{}", word.note);
    }
    if !word.definition.is_empty() {
        println!("{}", word.definition);
    }
    for example in &word.examples {
        println!("  > {}", example);
    }
    if !word.context.is_empty() {
        println!("\nContext: {}", word.context);
    }
    if !word.source_url.is_empty() {
        println!("Source:  {}", word.source_url);
    }

    let schedule = &word.schedule;
    let stats = &word.mastery.stats;
    println!();
    println!(
        "Mastery: {} (score {})",
        terminal::render_tag(word.mastery.mastery_tag, use_color),
        word.mastery.mastery_score
    );
    println!(
        "Reviews: again {} / hard {} / good {} / easy {}",
        stats.again, stats.hard, stats.good, stats.easy
    );
    println!(
        "Schedule: interval {}d, ease {:.2}, reps {}, lapses {}",
        schedule.interval, schedule.ease, schedule.reps, schedule.lapses
    );
    println!("Added:   {}", word.added_at.format("%Y-%m-%d %H:%M"));
    println!("Due:     {}", schedule.next_review.format("%Y-%m-%d %H:%M"));

    Ok(())
}
