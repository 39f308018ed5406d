use anyhow::Result;
use chrono::Utc;

use wordbook_lib::words::{format_interval, preview_intervals, Grade};

use crate::app::App;
use crate::OutputFormat;

pub fn run(app: &App, id: &str, format: &OutputFormat) -> Result<()> {
    let word = app.find_word(id)?;
    let preview = preview_intervals(&word.schedule, Utc::now());

    match format {
        OutputFormat::Json => {
            let output: serde_json::Map<String, serde_json::Value> = preview
                .iter()
                .map(|(grade, days)| (grade_name(*grade), serde_json::json!(days)))
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", word.term);
            for (grade, days) in &preview {
                println!("  {:<6} {}", grade_name(*grade), format_interval(*days));
            }
        }
    }

    Ok(())
}

fn grade_name(grade: Grade) -> String {
    format!("{:?}", grade).to_lowercase()
}
