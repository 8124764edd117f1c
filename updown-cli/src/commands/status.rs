//! Status command - current version and pending migrations

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use updown_core::{PendingSet, Version};

use super::{get_context, GlobalArgs};
use crate::output;

#[derive(Serialize)]
struct StatusOutput {
    database: String,
    migrations_dir: String,
    bootstrapped: bool,
    current_version: Option<Version>,
    pending: Option<PendingSet>,
}

pub fn run(args: &GlobalArgs, json: bool) -> Result<()> {
    let ctx = get_context(args)?;
    let service = &ctx.migration_service;

    let bootstrapped = service.is_bootstrapped()?;
    let (current_version, pending) = if bootstrapped {
        (service.current_version()?, Some(service.pending()?))
    } else {
        (None, None)
    };

    if json {
        let status = StatusOutput {
            database: ctx.config.database.display().to_string(),
            migrations_dir: ctx.config.migrations_dir.display().to_string(),
            bootstrapped,
            current_version,
            pending,
        };
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{}", "Migration Status".bold());
    println!();

    let mut table = output::create_table();
    table.add_row(vec!["Database", &ctx.config.database.display().to_string()]);
    table.add_row(vec!["Migrations", &ctx.config.migrations_dir.display().to_string()]);
    table.add_row(vec!["Current version", &output::format_version(current_version)]);
    println!("{}", table);
    println!();

    let Some(pending) = pending else {
        output::warning("The ledger table does not exist yet. Run `updown init` first.");
        return Ok(());
    };

    if pending.up.is_empty() {
        output::success("Database is up to date");
    } else {
        println!("{}", "Pending Migrations".bold());
        for version in &pending.up {
            println!("  • {}", version);
        }
    }

    let orphans: Vec<String> = pending
        .down
        .iter()
        .filter(|v| !pending.up.contains(*v))
        .map(|v| v.to_string())
        .collect();
    if !orphans.is_empty() {
        println!();
        output::warning(&format!(
            "Down migrations without a pending up file: {}",
            orphans.join(", ")
        ));
    }

    Ok(())
}
