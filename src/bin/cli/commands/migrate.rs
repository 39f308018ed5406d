use std::path::Path;

use anyhow::{Context, Result};

use wordbook_lib::words::{migrate_mastery, MigrationOutcome};

use crate::app;
use crate::OutputFormat;

pub fn run(config_path: Option<&Path>, format: &OutputFormat) -> Result<()> {
    let config = app::load_config(config_path)?;
    let store = app::open_store(&config)?;

    let outcome = migrate_mastery(&store).context("Mastery migration failed")?;

    match format {
        OutputFormat::Json => {
            let output = match outcome {
                MigrationOutcome::AlreadyDone => serde_json::json!({ "migrated": false }),
                MigrationOutcome::Migrated { total, backfilled } => serde_json::json!({
                    "migrated": true,
                    "total": total,
                    "backfilled": backfilled,
                }),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => match outcome {
            MigrationOutcome::AlreadyDone => println!("Already migrated, nothing to do."),
            MigrationOutcome::Migrated { total, backfilled } => {
                println!("Backfilled mastery on {} of {} words.", backfilled, total)
            }
        },
    }

    Ok(())
}
