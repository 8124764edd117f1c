//! Core domain entities
//!
//! Pure data structures describing migrations and the ledger that records
//! them. No I/O happens here.

mod ledger;
mod migration;
pub mod result;

pub use ledger::{LedgerEntry, LEDGER_TABLE};
pub use migration::{Direction, MigrationFiles, PendingSet, Version};
