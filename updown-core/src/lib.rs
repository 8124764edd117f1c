//! updown core - versioned up/down SQL migrations
//!
//! This crate implements the migration engine following hexagonal architecture:
//!
//! - **domain**: Versions, directions, ledger entries, errors
//! - **ports**: The `Repository` trait the engine consumes
//! - **services**: File store, ledger queries, migration engine, templates
//! - **adapters**: Concrete implementations (DuckDB)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::sync::Arc;

use adapters::duckdb::DuckDbRepository;
use config::Config;
use services::{FileStore, MigrationService};

// Re-export commonly used types at crate root
pub use domain::result::{Error, Result};
pub use domain::{Direction, LedgerEntry, PendingSet, Version};
pub use ports::Repository;

/// Main context for updown operations
///
/// Holds the configuration, the database connection and the migration
/// service built on top of them.
pub struct UpdownContext {
    pub config: Config,
    pub repository: Arc<DuckDbRepository>,
    pub migration_service: MigrationService,
}

impl UpdownContext {
    /// Open the configured database and migration folder.
    ///
    /// Fails with `InvalidFolder` before touching the database if the
    /// migration folder does not exist.
    pub fn new(config: Config) -> Result<Self> {
        let store = FileStore::new(&config.migrations_dir)?;
        let repository = Arc::new(DuckDbRepository::new(&config.database)?);

        let migration_service = MigrationService::new(
            Arc::clone(&repository) as Arc<dyn Repository>,
            store,
            config.base_version.clone(),
        );

        Ok(Self {
            config,
            repository,
            migration_service,
        })
    }
}
