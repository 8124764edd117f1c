//! Version ledger - query layer over the applied-migrations table
//!
//! The ledger is append-only. The newest entry's `current_version` is the
//! version the database is at. Recorded versions at or below that marker
//! count as applied; rows above it stay in the log but read as not applied.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use crate::domain::result::{Error, Result};
use crate::domain::{Direction, LedgerEntry, Version, LEDGER_TABLE};
use crate::ports::Repository;

pub struct Ledger {
    repository: Arc<dyn Repository>,
}

impl Ledger {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    /// Whether the ledger table exists
    pub fn is_present(&self) -> Result<bool> {
        self.repository.table_exists(LEDGER_TABLE)
    }

    /// Fail with `SchemaMissing` unless the ledger table exists
    pub fn ensure_schema_present(&self) -> Result<()> {
        if self.is_present()? {
            Ok(())
        } else {
            Err(Error::SchemaMissing(LEDGER_TABLE.to_string()))
        }
    }

    /// Version the database is at, `None` for an empty or fully rolled back ledger
    pub fn current_version(&self) -> Result<Option<Version>> {
        self.ensure_schema_present()?;
        Ok(self.repository.latest_current_version()?.flatten())
    }

    /// Versions reachable from the current marker
    pub fn applied_versions(&self) -> Result<BTreeSet<Version>> {
        let Some(current) = self.current_version()? else {
            return Ok(BTreeSet::new());
        };
        let applied: BTreeSet<Version> = self
            .repository
            .versions_at_or_below(current)?
            .into_iter()
            .collect();
        debug!(current = %current, applied = applied.len(), "read applied versions");
        Ok(applied)
    }

    /// Append an entry. Call only after the migration's SQL has run.
    pub fn record(
        &self,
        version: Version,
        direction: Direction,
        current_version_after: Option<Version>,
    ) -> Result<()> {
        self.repository
            .insert_entry(version, direction, current_version_after)
    }

    /// Greatest up-applied version strictly below `version`
    pub fn find_rollback_target(&self, version: Version) -> Result<Option<Version>> {
        self.ensure_schema_present()?;
        self.repository.max_version_below(Direction::Up, version)
    }

    /// Distinct up-applied versions `>= version`, newest first
    pub fn find_versions_since(&self, version: Version) -> Result<Vec<Version>> {
        self.ensure_schema_present()?;
        self.repository.versions_since(Direction::Up, version)
    }

    /// Full history in sequence order
    pub fn entries(&self) -> Result<Vec<LedgerEntry>> {
        self.ensure_schema_present()?;
        self.repository.ledger_entries()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::duckdb::DuckDbRepository;
    use crate::services::bootstrap::generate_base_ddl;

    fn ledger_with(entries: &[(i64, Direction, Option<i64>)]) -> Ledger {
        let repo = DuckDbRepository::in_memory().unwrap();
        repo.execute_script(&generate_base_ddl()).unwrap();
        for (version, direction, current) in entries {
            repo.insert_entry(Version::new(*version), *direction, current.map(Version::new))
                .unwrap();
        }
        Ledger::new(Arc::new(repo))
    }

    #[test]
    fn test_schema_missing() {
        let ledger = Ledger::new(Arc::new(DuckDbRepository::in_memory().unwrap()));
        assert!(matches!(ledger.current_version(), Err(Error::SchemaMissing(_))));
        assert!(matches!(ledger.applied_versions(), Err(Error::SchemaMissing(_))));
    }

    #[test]
    fn test_empty_ledger_has_no_version() {
        let ledger = ledger_with(&[]);
        assert_eq!(ledger.current_version().unwrap(), None);
        assert!(ledger.applied_versions().unwrap().is_empty());
    }

    #[test]
    fn test_rollback_target() {
        let ledger = ledger_with(&[
            (10, Direction::Up, Some(10)),
            (20, Direction::Up, Some(20)),
            (30, Direction::Up, Some(30)),
        ]);
        assert_eq!(ledger.find_rollback_target(Version::new(30)).unwrap(), Some(Version::new(20)));
        assert_eq!(ledger.find_rollback_target(Version::new(10)).unwrap(), None);
    }

    #[test]
    fn test_applied_versions_follow_current_marker() {
        let ledger = ledger_with(&[
            (10, Direction::Up, Some(10)),
            (20, Direction::Up, Some(20)),
            (30, Direction::Up, Some(30)),
            (30, Direction::Down, Some(20)),
        ]);
        assert_eq!(ledger.current_version().unwrap(), Some(Version::new(20)));
        assert_eq!(
            ledger.applied_versions().unwrap().into_iter().collect::<Vec<_>>(),
            vec![Version::new(10), Version::new(20)]
        );
    }

    #[test]
    fn test_versions_since_is_descending_and_distinct() {
        let ledger = ledger_with(&[
            (10, Direction::Up, Some(10)),
            (20, Direction::Up, Some(20)),
            (20, Direction::Down, Some(10)),
            (20, Direction::Up, Some(20)),
        ]);
        assert_eq!(
            ledger.find_versions_since(Version::new(10)).unwrap(),
            vec![Version::new(20), Version::new(10)]
        );
        assert_eq!(ledger.entries().unwrap().len(), 4);
    }
}
