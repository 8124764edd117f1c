//! Rollback command - revert migrations down to a version

use anyhow::{anyhow, Result};
use colored::Colorize;
use updown_core::{Direction, Version};

use super::{apply_each, confirm, get_context, in_transaction, GlobalArgs};
use crate::output;

pub fn run(args: &GlobalArgs, target: Version, yes: bool) -> Result<()> {
    let ctx = get_context(args)?;
    let service = &ctx.migration_service;

    let reverted = in_transaction(service, |s| {
        let plan = s.rollback_plan(target)?;
        if plan.is_empty() {
            output::info(&format!("Nothing at or above {} is applied", target));
            return Ok(Vec::new());
        }

        println!("\nThese migrations will be reverted, newest first:");
        for version in &plan {
            println!("  • {}", version);
        }
        if !confirm("Are you sure you want to continue?", false, yes)? {
            return Err(anyhow!("Cancelled"));
        }

        apply_each(s, &plan, Direction::Down, yes)
    })?;

    if !reverted.is_empty() {
        println!();
        output::success(&format!("Reverted {} migration(s)", reverted.len()));
        println!(
            "Current version: {}",
            output::format_version(service.current_version()?).bold()
        );
    }
    Ok(())
}
