//! Up command - run new migrations

use anyhow::Result;

use super::{get_context, in_transaction, run_pending_up, GlobalArgs};
use crate::output;

pub fn run(args: &GlobalArgs, yes: bool) -> Result<()> {
    let ctx = get_context(args)?;
    let service = &ctx.migration_service;

    let applied = in_transaction(service, |s| run_pending_up(s, yes))?;

    if !applied.is_empty() {
        println!();
        output::success(&format!("Applied {} migration(s)", applied.len()));
    }
    Ok(())
}
