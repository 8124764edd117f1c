//! Configuration management
//!
//! Settings live in `updown.json` in the project directory:
//! ```json
//! {
//!   "database": "app.duckdb",
//!   "migrationsDir": "migrations",
//!   "baseVersion": "base"
//! }
//! ```
//! Every key is optional. Environment variables override the file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::result::Result;
use crate::services::bootstrap::DEFAULT_BASE_VERSION;

pub const SETTINGS_FILE: &str = "updown.json";

pub const DATABASE_ENV: &str = "UPDOWN_DATABASE";
pub const MIGRATIONS_DIR_ENV: &str = "UPDOWN_MIGRATIONS_DIR";
pub const BASE_VERSION_ENV: &str = "UPDOWN_BASE_VERSION";

const DEFAULT_DATABASE: &str = "updown.duckdb";
const DEFAULT_MIGRATIONS_DIR: &str = "migrations";

/// Raw updown.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    database: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    migrations_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_version: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Resolved updown configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database: PathBuf,
    pub migrations_dir: PathBuf,
    pub base_version: String,
}

impl Config {
    /// Defaults relative to `project_dir`
    pub fn defaults(project_dir: &Path) -> Self {
        Self {
            database: project_dir.join(DEFAULT_DATABASE),
            migrations_dir: project_dir.join(DEFAULT_MIGRATIONS_DIR),
            base_version: DEFAULT_BASE_VERSION.to_string(),
        }
    }

    /// Load config from the project directory, applying environment overrides
    pub fn load(project_dir: &Path) -> Result<Self> {
        Self::load_with_env(project_dir, |key| std::env::var(key).ok())
    }

    /// Load config using `env` to look up override variables
    pub fn load_with_env(project_dir: &Path, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw = read_settings(project_dir)?;
        let defaults = Self::defaults(project_dir);

        let database = env(DATABASE_ENV)
            .or(raw.database)
            .map(|p| project_dir.join(p))
            .unwrap_or(defaults.database);
        let migrations_dir = env(MIGRATIONS_DIR_ENV)
            .or(raw.migrations_dir)
            .map(|p| project_dir.join(p))
            .unwrap_or(defaults.migrations_dir);
        let base_version = env(BASE_VERSION_ENV)
            .or(raw.base_version)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.base_version);

        Ok(Self {
            database,
            migrations_dir,
            base_version,
        })
    }

    /// Save config to the project directory.
    /// Keys this tool doesn't manage are preserved.
    pub fn save(&self, project_dir: &Path) -> Result<()> {
        let mut settings = read_settings(project_dir)?;

        settings.database = Some(display_relative(&self.database, project_dir));
        settings.migrations_dir = Some(display_relative(&self.migrations_dir, project_dir));
        settings.base_version = Some(self.base_version.clone());

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(project_dir.join(SETTINGS_FILE), content)?;
        Ok(())
    }
}

fn read_settings(project_dir: &Path) -> Result<SettingsFile> {
    let settings_path = project_dir.join(SETTINGS_FILE);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)?;
    Ok(serde_json::from_str(&content)?)
}

fn display_relative(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_defaults_without_settings_file() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load_with_env(temp_dir.path(), no_env).unwrap();

        assert_eq!(config.database, temp_dir.path().join("updown.duckdb"));
        assert_eq!(config.migrations_dir, temp_dir.path().join("migrations"));
        assert_eq!(config.base_version, "base");
    }

    #[test]
    fn test_settings_file_is_read() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(SETTINGS_FILE),
            r#"{"database": "db/app.duckdb", "migrationsDir": "sql", "baseVersion": "first"}"#,
        )
        .unwrap();

        let config = Config::load_with_env(temp_dir.path(), no_env).unwrap();
        assert_eq!(config.database, temp_dir.path().join("db/app.duckdb"));
        assert_eq!(config.migrations_dir, temp_dir.path().join("sql"));
        assert_eq!(config.base_version, "first");
    }

    #[test]
    fn test_env_overrides_settings_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(SETTINGS_FILE),
            r#"{"migrationsDir": "sql", "baseVersion": "first"}"#,
        )
        .unwrap();

        let config = Config::load_with_env(temp_dir.path(), |key| match key {
            MIGRATIONS_DIR_ENV => Some("/abs/migrations".to_string()),
            BASE_VERSION_ENV => Some("0".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.migrations_dir, PathBuf::from("/abs/migrations"));
        assert_eq!(config.base_version, "0");
    }

    #[test]
    fn test_invalid_settings_file_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join(SETTINGS_FILE), "{not json").unwrap();

        assert!(matches!(
            Config::load_with_env(temp_dir.path(), no_env),
            Err(crate::Error::Json(_))
        ));
    }

    #[test]
    fn test_save_preserves_unknown_keys() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(SETTINGS_FILE),
            r#"{"team": "payments", "baseVersion": "first"}"#,
        )
        .unwrap();

        let mut config = Config::load_with_env(temp_dir.path(), no_env).unwrap();
        config.base_version = "root".to_string();
        config.save(temp_dir.path()).unwrap();

        let content = std::fs::read_to_string(temp_dir.path().join(SETTINGS_FILE)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["team"], "payments");
        assert_eq!(value["baseVersion"], "root");
        assert_eq!(value["migrationsDir"], "migrations");
    }
}
