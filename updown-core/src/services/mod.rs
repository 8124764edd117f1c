//! Service layer - migration orchestration
//!
//! Each service focuses on one part of the migration workflow: files on
//! disk, the ledger table, and the engine that reconciles the two.

pub mod bootstrap;
pub mod file_store;
pub mod ledger;
pub mod migration;

pub use file_store::FileStore;
pub use ledger::Ledger;
pub use migration::{AppliedMigration, MigrationPreview, MigrationService};
