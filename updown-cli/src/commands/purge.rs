//! Purge command - drop every table in the database

use anyhow::{anyhow, Result};
use colored::Colorize;
use dialoguer::Input;

use super::{get_context, in_transaction, GlobalArgs};
use crate::output;

const CONFIRMATION_WORD: &str = "purge";

pub fn run(args: &GlobalArgs, force: bool, reinit: bool) -> Result<()> {
    let ctx = get_context(args)?;
    let service = &ctx.migration_service;

    if !force {
        println!(
            "\n{}",
            format!(
                "This will drop EVERY table in {}. This cannot be undone.",
                ctx.config.database.display()
            )
            .red()
            .bold()
        );
        let typed: String = Input::new()
            .with_prompt(format!("Type '{}' to confirm", CONFIRMATION_WORD))
            .allow_empty(true)
            .interact_text()?;
        if typed.trim() != CONFIRMATION_WORD {
            return Err(anyhow!("Cancelled"));
        }
    }

    let dropped = in_transaction(service, |s| {
        let dropped = s.purge()?;
        if reinit {
            s.bootstrap()?;
        }
        Ok(dropped)
    })?;

    if dropped.is_empty() {
        output::info("The database had no tables");
    } else {
        for table in &dropped {
            println!("  {} {}", "dropped".dimmed(), table);
        }
        output::success(&format!("Dropped {} table(s)", dropped.len()));
    }
    if reinit {
        output::success("Ledger table re-created");
    }
    Ok(())
}
