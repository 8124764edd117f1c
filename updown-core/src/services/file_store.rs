//! File store - migration SQL files on disk
//!
//! Layout of the migration folder:
//!
//! ```text
//! migrations/
//!   base.sql          ledger table DDL (named by the base version token)
//!   u_1621698206.sql  up migration
//!   d_1621698206.sql  matching down migration
//! ```

use std::fs;
use std::path::PathBuf;

use regex::Regex;
use tracing::{debug, warn};

use crate::domain::result::{Error, Result};
use crate::domain::{Direction, MigrationFiles, Version};

const MIGRATION_FILE_PATTERN: &str = r"^([ud])_(.+)\.sql$";

/// Reads and writes migration files in one folder
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    pattern: Regex,
}

impl FileStore {
    /// Create a store over an existing folder
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(Error::InvalidFolder(dir));
        }
        let pattern = Regex::new(MIGRATION_FILE_PATTERN)
            .map_err(|e| Error::config(format!("invalid migration file pattern: {}", e)))?;
        Ok(Self { dir, pattern })
    }

    /// Path of `{u|d}_{version}.sql`
    pub fn path_for(&self, direction: Direction, version: Version) -> PathBuf {
        self.dir
            .join(format!("{}_{}.sql", direction.prefix(), version))
    }

    /// Path of the undecorated `{base}.sql`
    pub fn base_path(&self, base_version: &str) -> PathBuf {
        self.dir.join(format!("{}.sql", base_version))
    }

    pub fn exists(&self, direction: Direction, version: Version) -> bool {
        self.path_for(direction, version).is_file()
    }

    pub fn base_exists(&self, base_version: &str) -> bool {
        self.base_path(base_version).is_file()
    }

    /// Read the SQL for one migration
    pub fn read(&self, direction: Direction, version: Version) -> Result<String> {
        read_sql(self.path_for(direction, version))
    }

    /// Read the base (bootstrap) file
    pub fn read_base(&self, base_version: &str) -> Result<String> {
        read_sql(self.base_path(base_version))
    }

    /// Create or overwrite a migration file
    pub fn write(&self, direction: Direction, version: Version, content: &str) -> Result<PathBuf> {
        let path = self.path_for(direction, version);
        fs::write(&path, content)?;
        debug!(path = %path.display(), "wrote migration file");
        Ok(path)
    }

    /// Create or overwrite the base file
    pub fn write_base(&self, base_version: &str, content: &str) -> Result<PathBuf> {
        let path = self.base_path(base_version);
        fs::write(&path, content)?;
        debug!(path = %path.display(), "wrote base file");
        Ok(path)
    }

    /// Scan the folder for `{u|d}_<version>.sql` files.
    ///
    /// Files that look like migrations but whose version is not written the
    /// way `path_for` writes it (`u_abc`, `u_007`, `u_+7`) are skipped with a
    /// warning. Everything else in the folder is ignored.
    pub fn list_all(&self) -> Result<MigrationFiles> {
        let mut files = MigrationFiles::default();

        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let Some(caps) = self.pattern.captures(name) else {
                continue;
            };
            let Some(direction) = Direction::from_prefix(&caps[1]) else {
                continue;
            };
            match caps[2].parse::<Version>() {
                Ok(v) if v.to_string() == caps[2] => files.insert(direction, v),
                _ => warn!(file = name, "ignoring migration file with malformed version"),
            }
        }

        debug!(
            dir = %self.dir.display(),
            up = files.up.len(),
            down = files.down.len(),
            "scanned migration folder"
        );
        Ok(files)
    }
}

fn read_sql(path: PathBuf) -> Result<String> {
    if !path.is_file() {
        return Err(Error::NotFound(path));
    }
    Ok(fs::read_to_string(&path)?)
}
