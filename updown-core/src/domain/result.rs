//! Error types for the core library

use std::path::PathBuf;

use thiserror::Error;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    /// A referenced migration file does not exist
    #[error("Migration file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The ledger table is absent; the database must be bootstrapped first
    #[error("Ledger table '{0}' does not exist. Run `updown init` first")]
    SchemaMissing(String),

    /// Bootstrap was requested on a database that already has a ledger
    #[error("Ledger table '{0}' already exists, database is already bootstrapped")]
    AlreadyBootstrapped(String),

    /// The database rejected a statement
    #[error("SQL execution failed: {0}")]
    Execution(String),

    /// The configured migration directory does not exist
    #[error("Migration folder does not exist: {}. Please create it", .0.display())]
    InvalidFolder(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an execution error
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;
