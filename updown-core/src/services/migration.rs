//! Migration service - reconciles migration files against the ledger
//!
//! A run looks like:
//! 1. `begin()` opens the run's transaction
//! 2. `pending()` lists work (fails with `SchemaMissing` before bootstrap)
//! 3. `apply()` once per version the caller approves; declined versions are
//!    simply skipped
//! 4. `commit()`, or `rollback()` if anything failed
//!
//! `bootstrap()` commits on its own so the ledger table survives a failed run.

use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use sqlparser::dialect::DuckDbDialect;
use sqlparser::parser::Parser;
use tracing::{debug, info};

use crate::domain::result::{Error, Result};
use crate::domain::{Direction, LedgerEntry, PendingSet, Version, LEDGER_TABLE};
use crate::ports::Repository;
use crate::services::bootstrap::{generate_base_ddl, generate_down_template, generate_up_template};
use crate::services::file_store::FileStore;
use crate::services::ledger::Ledger;

/// Outcome of a successful `apply()`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedMigration {
    pub version: Version,
    pub direction: Direction,
    /// Version the database is at afterwards
    pub current_version: Option<Version>,
}

/// SQL about to be applied, for the caller's approval step
#[derive(Debug, Clone, Serialize)]
pub struct MigrationPreview {
    pub version: Version,
    pub direction: Direction,
    pub sql: String,
    /// Statements found by the SQL parser, `None` if it could not parse the file
    pub statement_count: Option<usize>,
    pub parse_warning: Option<String>,
}

/// Service for applying and reverting migrations
pub struct MigrationService {
    repository: Arc<dyn Repository>,
    ledger: Ledger,
    store: FileStore,
    base_version: String,
}

impl MigrationService {
    pub fn new(
        repository: Arc<dyn Repository>,
        store: FileStore,
        base_version: impl Into<String>,
    ) -> Self {
        Self {
            ledger: Ledger::new(Arc::clone(&repository)),
            repository,
            store,
            base_version: base_version.into(),
        }
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    pub fn base_version(&self) -> &str {
        &self.base_version
    }

    // === Transactions ===

    pub fn begin(&self) -> Result<()> {
        self.repository.begin()
    }

    pub fn commit(&self) -> Result<()> {
        self.repository.commit()
    }

    pub fn rollback(&self) -> Result<()> {
        self.repository.rollback()
    }

    // === Queries ===

    /// Migration files not reflected in the ledger's current state.
    ///
    /// Recomputed from scratch on every call.
    pub fn pending(&self) -> Result<PendingSet> {
        let applied = self.ledger.applied_versions()?;
        let files = self.store.list_all()?;

        let pending = PendingSet {
            up: files.up.difference(&applied).copied().collect(),
            down: files.down.difference(&applied).copied().collect(),
        };
        debug!(up = pending.up.len(), down = pending.down.len(), "computed pending set");
        Ok(pending)
    }

    pub fn current_version(&self) -> Result<Option<Version>> {
        self.ledger.current_version()
    }

    pub fn is_bootstrapped(&self) -> Result<bool> {
        self.ledger.is_present()
    }

    /// Up-applied versions `>= version`, newest first
    pub fn versions_since(&self, version: Version) -> Result<Vec<Version>> {
        self.ledger.find_versions_since(version)
    }

    /// Versions to revert, newest first, to undo `target` and everything after it
    pub fn rollback_plan(&self, target: Version) -> Result<Vec<Version>> {
        let Some(current) = self.ledger.current_version()? else {
            return Ok(Vec::new());
        };
        Ok(self
            .ledger
            .find_versions_since(target)?
            .into_iter()
            .filter(|v| *v <= current)
            .collect())
    }

    pub fn history(&self) -> Result<Vec<LedgerEntry>> {
        self.ledger.entries()
    }

    /// Load a migration's SQL for review
    pub fn preview(&self, version: Version, direction: Direction) -> Result<MigrationPreview> {
        let sql = self.store.read(direction, version)?;
        let (statement_count, parse_warning) = match Parser::parse_sql(&DuckDbDialect {}, &sql) {
            Ok(statements) => (Some(statements.len()), None),
            Err(e) => {
                let msg = e.to_string();
                (None, Some(msg.trim_start_matches("sql parser error: ").to_string()))
            }
        };
        Ok(MigrationPreview {
            version,
            direction,
            sql,
            statement_count,
            parse_warning,
        })
    }

    // === Commands ===

    /// Execute one migration file and record it in the ledger.
    ///
    /// Nothing is recorded if the file is missing or the SQL fails.
    pub fn apply(&self, version: Version, direction: Direction) -> Result<AppliedMigration> {
        self.ledger.ensure_schema_present()?;
        let sql = self.store.read(direction, version)?;

        self.repository.execute_script(&sql)?;

        let current_version = match direction {
            Direction::Up => Some(version),
            Direction::Down => self.ledger.find_rollback_target(version)?,
        };
        self.ledger.record(version, direction, current_version)?;

        info!(
            version = %version,
            direction = %direction,
            current = ?current_version.map(|v| v.as_i64()),
            "applied migration"
        );
        Ok(AppliedMigration {
            version,
            direction,
            current_version,
        })
    }

    /// Create the ledger table from the base file.
    ///
    /// The base file is written from the generated DDL if it does not exist
    /// yet. When a transaction is open it is committed right after the DDL
    /// runs and a fresh one is started for the rest of the run.
    pub fn bootstrap(&self) -> Result<()> {
        if self.ledger.is_present()? {
            return Err(Error::AlreadyBootstrapped(LEDGER_TABLE.to_string()));
        }

        let sql = if self.store.base_exists(&self.base_version) {
            self.store.read_base(&self.base_version)?
        } else {
            let ddl = generate_base_ddl();
            self.store.write_base(&self.base_version, &ddl)?;
            ddl
        };

        self.repository.execute_script(&sql)?;

        if self.repository.in_transaction() {
            self.repository.commit()?;
            self.repository.begin()?;
        }

        info!(base = %self.base_version, table = LEDGER_TABLE, "bootstrapped ledger");
        Ok(())
    }

    /// Drop every table in the database, dependents before the tables they
    /// reference. Irreversible; callers must confirm before invoking it.
    pub fn purge(&self) -> Result<Vec<String>> {
        let mut remaining: BTreeSet<String> = self.repository.list_tables()?.into_iter().collect();
        let edges: Vec<(String, String)> = self
            .repository
            .foreign_keys()?
            .into_iter()
            .filter(|(table, referenced)| table != referenced)
            .collect();

        let mut dropped = Vec::with_capacity(remaining.len());
        while !remaining.is_empty() {
            // Tables no other remaining table points at
            let referenced: HashSet<&str> = edges
                .iter()
                .filter(|(table, _)| remaining.contains(table))
                .map(|(_, referenced)| referenced.as_str())
                .collect();
            let droppable: Vec<String> = remaining
                .iter()
                .filter(|t| !referenced.contains(t.as_str()))
                .cloned()
                .collect();

            if droppable.is_empty() {
                let cycle: Vec<&str> = remaining.iter().map(String::as_str).collect();
                return Err(Error::execution(format!(
                    "cannot purge tables with circular foreign keys: {}",
                    cycle.join(", ")
                )));
            }

            for table in droppable {
                self.repository.drop_table(&table)?;
                info!(table = %table, "dropped table");
                remaining.remove(&table);
                dropped.push(table);
            }
        }

        Ok(dropped)
    }

    // === Scaffolding ===

    /// A fresh version token: the current Unix timestamp
    pub fn next_version() -> Version {
        Version::new(Utc::now().timestamp())
    }

    /// Write an empty up/down pair for `version`. Existing files are never overwritten.
    pub fn scaffold(&self, version: Version) -> Result<(PathBuf, PathBuf)> {
        for direction in [Direction::Up, Direction::Down] {
            if self.store.exists(direction, version) {
                return Err(Error::validation(format!(
                    "{} already exists",
                    self.store.path_for(direction, version).display()
                )));
            }
        }
        let up = self
            .store
            .write(Direction::Up, version, &generate_up_template(version))?;
        let down = self
            .store
            .write(Direction::Down, version, &generate_down_template(version))?;
        Ok((up, down))
    }

    /// Write the generated ledger DDL as the base file
    pub fn write_base(&self) -> Result<PathBuf> {
        self.store
            .write_base(&self.base_version, &generate_base_ddl())
    }
}
