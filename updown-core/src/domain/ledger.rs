//! Ledger entries - the append-only record of applied migrations

use chrono::NaiveDateTime;
use serde::Serialize;

use super::migration::{Direction, Version};

/// Name of the table that records applied migrations
pub const LEDGER_TABLE: &str = "updown_versions";

/// One applied migration action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    /// Monotonic id assigned by the ledger
    pub sequence_id: i64,
    pub version: Version,
    pub applied_at: NaiveDateTime,
    pub direction: Direction,
    /// Version the database is at after this entry.
    /// `None` once the first migration has been rolled back.
    pub current_version: Option<Version>,
}
