//! DuckDB repository implementation

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDateTime;
use duckdb::{params, Connection};
use tracing::debug;

use crate::domain::result::{Error, Result};
use crate::domain::{Direction, LedgerEntry, Version};
use crate::ports::Repository;

impl From<duckdb::Error> for Error {
    fn from(err: duckdb::Error) -> Self {
        Error::Execution(err.to_string())
    }
}

/// DuckDB repository implementation
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
    in_transaction: AtomicBool,
}

impl DuckDbRepository {
    /// Open (or create) a database file
    pub fn new(db_path: &Path) -> Result<Self> {
        // Extension autoloading stays off so a stale ~/.duckdb cache can't break opening
        let config = duckdb::Config::default().enable_autoload_extension(false)?;
        let conn = Connection::open_with_flags(db_path, config)?;
        debug!(path = %db_path.display(), "opened database");

        Ok(Self {
            conn: Mutex::new(conn),
            in_transaction: AtomicBool::new(false),
        })
    }

    /// Open a private in-memory database
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
            in_transaction: AtomicBool::new(false),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| Error::execution(format!("database connection poisoned: {}", e)))
    }
}

impl Repository for DuckDbRepository {
    fn execute_script(&self, sql: &str) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch(sql)?;
        Ok(())
    }

    fn begin(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch("BEGIN TRANSACTION")?;
        self.in_transaction.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch("COMMIT")?;
        self.in_transaction.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn rollback(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch("ROLLBACK")?;
        self.in_transaction.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn in_transaction(&self) -> bool {
        self.in_transaction.load(Ordering::SeqCst)
    }

    fn table_exists(&self, name: &str) -> Result<bool> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM information_schema.tables
             WHERE table_schema = 'main' AND table_name = ?",
            [name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn list_tables(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT table_name FROM information_schema.tables
             WHERE table_schema = 'main' AND table_type = 'BASE TABLE'
             ORDER BY table_name",
        )?;
        let tables = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(tables)
    }

    fn foreign_keys(&self) -> Result<Vec<(String, String)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT table_name, referenced_table FROM duckdb_constraints()
             WHERE constraint_type = 'FOREIGN KEY' AND schema_name = 'main'",
        )?;
        let edges = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(edges)
    }

    fn drop_table(&self, name: &str) -> Result<()> {
        let conn = self.conn()?;
        // Identifiers can't be bound, so quote them
        conn.execute_batch(&format!("DROP TABLE IF EXISTS {}", quote_identifier(name)))?;
        Ok(())
    }

    fn latest_current_version(&self) -> Result<Option<Option<Version>>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT current_version FROM updown_versions ORDER BY id DESC LIMIT 1")?;
        let mut rows = stmt.query([])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get::<_, Option<i64>>(0)?.map(Version::new))),
            None => Ok(None),
        }
    }

    fn versions_at_or_below(&self, version: Version) -> Result<Vec<Version>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT version FROM updown_versions WHERE version <= ? ORDER BY version",
        )?;
        let versions = stmt
            .query_map(params![version.as_i64()], |row| row.get::<_, i64>(0))?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(versions.into_iter().map(Version::new).collect())
    }

    fn max_version_below(&self, direction: Direction, version: Version) -> Result<Option<Version>> {
        let conn = self.conn()?;
        let found: Option<i64> = conn.query_row(
            "SELECT MAX(version) FROM updown_versions WHERE direction = ? AND version < ?",
            params![direction.as_str(), version.as_i64()],
            |row| row.get(0),
        )?;
        Ok(found.map(Version::new))
    }

    fn versions_since(&self, direction: Direction, version: Version) -> Result<Vec<Version>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT DISTINCT version FROM updown_versions
             WHERE direction = ? AND version >= ?
             ORDER BY version DESC",
        )?;
        let versions = stmt
            .query_map(params![direction.as_str(), version.as_i64()], |row| {
                row.get::<_, i64>(0)
            })?
            .collect::<duckdb::Result<Vec<_>>>()?;
        Ok(versions.into_iter().map(Version::new).collect())
    }

    fn insert_entry(
        &self,
        version: Version,
        direction: Direction,
        current_version: Option<Version>,
    ) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO updown_versions (version, direction, current_version) VALUES (?, ?, ?)",
            params![
                version.as_i64(),
                direction.as_str(),
                current_version.map(|v| v.as_i64())
            ],
        )?;
        Ok(())
    }

    fn ledger_entries(&self) -> Result<Vec<LedgerEntry>> {
        let conn = self.conn()?;
        // run_at::VARCHAR avoids depending on duckdb-rs timestamp conversions
        let mut stmt = conn.prepare(
            "SELECT id, version, run_at::VARCHAR, direction, current_version
             FROM updown_versions ORDER BY id",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<i64>>(4)?,
                ))
            })?
            .collect::<duckdb::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(id, version, run_at, direction, current_version)| {
                let run_at = run_at.ok_or_else(|| {
                    Error::execution(format!("ledger entry {} has no run_at", id))
                })?;
                Ok(LedgerEntry {
                    sequence_id: id,
                    version: Version::new(version),
                    applied_at: parse_naive_datetime(&run_at)?,
                    direction: direction.parse()?,
                    current_version: current_version.map(Version::new),
                })
            })
            .collect()
    }
}

/// Double-quote an identifier, doubling any embedded quotes
fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn parse_naive_datetime(s: &str) -> Result<NaiveDateTime> {
    // Timestamp formats DuckDB produces when casting to VARCHAR
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
        .map_err(|e| Error::execution(format!("unreadable run_at '{}': {}", s, e)))
}
