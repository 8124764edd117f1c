//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use updown_core::services::MigrationPreview;
use updown_core::Version;

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Render an optional version, `-` when the database is at no version
pub fn format_version(version: Option<Version>) -> String {
    version.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Print a migration's SQL ahead of the approval prompt
pub fn print_preview(preview: &MigrationPreview) {
    println!();
    println!(
        "{}",
        format!("{}_{}.sql", preview.direction.prefix(), preview.version).bold()
    );
    for line in preview.sql.lines() {
        println!("  {}", line.dimmed());
    }
    match (&preview.statement_count, &preview.parse_warning) {
        (Some(count), _) => println!("{}", format!("{} statement(s)", count).dimmed()),
        (None, Some(warning_msg)) => warning(&format!("Could not parse this file: {}", warning_msg)),
        (None, None) => {}
    }
}
