//! Init command - bootstrap the ledger table, then run new migrations

use anyhow::Result;

use super::{get_context, in_transaction, run_pending_up, GlobalArgs};
use crate::output;

pub fn run(args: &GlobalArgs, yes: bool) -> Result<()> {
    let ctx = get_context(args)?;
    let service = &ctx.migration_service;

    in_transaction(service, |s| {
        // Commits on its own, so the ledger stays even if a migration below fails
        s.bootstrap()?;
        println!();
        output::success("Initial migration ran");

        run_pending_up(s, yes)
    })?;

    Ok(())
}
