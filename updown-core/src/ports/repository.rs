//! Repository port - database abstraction

use crate::domain::result::Result;
use crate::domain::{Direction, LedgerEntry, Version};

/// Database capability consumed by the migration engine
///
/// Implementations must bind every version and direction value as a query
/// parameter. Ledger queries assume the ledger table exists; callers check
/// with [`Repository::table_exists`] first.
pub trait Repository: Send + Sync {
    // === Execution ===

    /// Execute a migration script (one or more statements)
    fn execute_script(&self, sql: &str) -> Result<()>;

    // === Transactions ===

    fn begin(&self) -> Result<()>;

    fn commit(&self) -> Result<()>;

    fn rollback(&self) -> Result<()>;

    /// Whether an explicit transaction is currently open
    fn in_transaction(&self) -> bool;

    // === Catalog ===

    fn table_exists(&self, name: &str) -> Result<bool>;

    /// All user tables in the database
    fn list_tables(&self) -> Result<Vec<String>>;

    /// Foreign key edges as `(table, referenced_table)`
    fn foreign_keys(&self) -> Result<Vec<(String, String)>>;

    fn drop_table(&self, name: &str) -> Result<()>;

    // === Ledger ===

    /// `current_version` of the entry with the highest sequence id.
    /// Outer `None` means the ledger is empty.
    fn latest_current_version(&self) -> Result<Option<Option<Version>>>;

    /// Distinct ledger versions `<= version`, ascending
    fn versions_at_or_below(&self, version: Version) -> Result<Vec<Version>>;

    /// Greatest version recorded with `direction` that is `< version`
    fn max_version_below(&self, direction: Direction, version: Version) -> Result<Option<Version>>;

    /// Distinct versions recorded with `direction` that are `>= version`, descending
    fn versions_since(&self, direction: Direction, version: Version) -> Result<Vec<Version>>;

    /// Append a ledger entry
    fn insert_entry(
        &self,
        version: Version,
        direction: Direction,
        current_version: Option<Version>,
    ) -> Result<()>;

    /// Every ledger entry in sequence order
    fn ledger_entries(&self) -> Result<Vec<LedgerEntry>>;
}
