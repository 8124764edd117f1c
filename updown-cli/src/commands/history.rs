//! History command - every recorded migration action

use anyhow::Result;

use super::{get_context, GlobalArgs};
use crate::output;

pub fn run(args: &GlobalArgs, json: bool) -> Result<()> {
    let ctx = get_context(args)?;
    let entries = ctx.migration_service.history()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        output::info("No migrations have been run yet");
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec!["#", "Version", "Direction", "Run at", "Current version"]);
    for entry in &entries {
        table.add_row(vec![
            entry.sequence_id.to_string(),
            entry.version.to_string(),
            entry.direction.to_string(),
            entry.applied_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            output::format_version(entry.current_version),
        ]);
    }
    println!("{}", table);
    Ok(())
}
