//! Base command - print the ledger schema and save it as the base file

use anyhow::Result;
use colored::Colorize;
use updown_core::services::bootstrap::generate_base_ddl;

use super::{confirm, get_context, GlobalArgs};
use crate::output;

pub fn run(args: &GlobalArgs, yes: bool) -> Result<()> {
    let ctx = get_context(args)?;
    let service = &ctx.migration_service;
    let base_version = service.base_version();

    println!("{}\n", format!("{}.sql", base_version).bold());
    println!("{}", generate_base_ddl());

    if service.store().base_exists(base_version) {
        output::warning(&format!(
            "{} already exists and will be overwritten",
            service.store().base_path(base_version).display()
        ));
    }

    if !confirm("Do you want to save it to the migration folder?", true, yes)? {
        return Ok(());
    }

    let path = service.write_base()?;
    output::success(&format!("Saved {}", path.display()));
    Ok(())
}
