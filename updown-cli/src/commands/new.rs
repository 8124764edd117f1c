//! New command - scaffold an up/down migration pair

use anyhow::Result;
use updown_core::services::MigrationService;
use updown_core::Version;

use super::{get_context, GlobalArgs};
use crate::output;

pub fn run(args: &GlobalArgs, version: Option<Version>) -> Result<()> {
    let ctx = get_context(args)?;
    let version = version.unwrap_or_else(MigrationService::next_version);

    let (up, down) = ctx.migration_service.scaffold(version)?;

    output::success(&format!("Created migration {}", version));
    println!("  {}", up.display());
    println!("  {}", down.display());
    Ok(())
}
