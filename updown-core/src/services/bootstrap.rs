//! Base bootstrap - ledger table DDL and migration scaffolds
//!
//! Pure string templating. Nothing here touches the filesystem or database.

use crate::domain::{Version, LEDGER_TABLE};

/// Base version token used when none is configured
pub const DEFAULT_BASE_VERSION: &str = "base";

/// DDL for the ledger table
pub fn generate_base_ddl() -> String {
    format!(
        "CREATE SEQUENCE IF NOT EXISTS {table}_id_seq START 1;
CREATE TABLE {table} (
    id BIGINT PRIMARY KEY DEFAULT nextval('{table}_id_seq'),
    version BIGINT NOT NULL,
    run_at TIMESTAMP NOT NULL DEFAULT current_timestamp,
    direction VARCHAR NOT NULL CHECK (direction IN ('up', 'down')),
    current_version BIGINT
);
",
        table = LEDGER_TABLE
    )
}

/// Empty up-migration stamped with its version
pub fn generate_up_template(version: Version) -> String {
    template(version, "up", "apply")
}

/// Empty down-migration stamped with its version
pub fn generate_down_template(version: Version) -> String {
    template(version, "down", "revert")
}

fn template(version: Version, direction: &str, verb: &str) -> String {
    let header = format!("-- Version {} ({})", version, direction);
    format!(
        "{header}\n-- Add the statements that {verb} this migration below.\n{rule}\n\n",
        rule = "-".repeat(header.len()),
    )
}
