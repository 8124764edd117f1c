//! CLI command implementations

pub mod base;
pub mod history;
pub mod init;
pub mod new;
pub mod purge;
pub mod rollback;
pub mod status;
pub mod up;

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use dialoguer::Confirm;
use updown_core::config::Config;
use updown_core::services::MigrationService;
use updown_core::{Direction, UpdownContext, Version};

use crate::output;

/// Flags shared by every command
pub struct GlobalArgs {
    pub project: PathBuf,
    pub database: Option<PathBuf>,
    pub dir: Option<PathBuf>,
}

/// Resolve configuration: updown.json, then env vars, then flags
pub fn load_config(args: &GlobalArgs) -> Result<Config> {
    let mut config = Config::load(&args.project)
        .with_context(|| format!("Failed to load config from {:?}", args.project))?;

    if let Some(database) = &args.database {
        config.database = database.clone();
    }
    if let Some(dir) = &args.dir {
        config.migrations_dir = dir.clone();
    }
    Ok(config)
}

/// Open the database and migration folder
pub fn get_context(args: &GlobalArgs) -> Result<UpdownContext> {
    let config = load_config(args)?;
    UpdownContext::new(config).context("Failed to initialize updown context")
}

/// Ask a yes/no question unless `assume_yes` is set
pub fn confirm(prompt: &str, default: bool, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}

/// Run `work` inside one transaction; roll back if it fails
pub fn in_transaction<T>(
    service: &MigrationService,
    work: impl FnOnce(&MigrationService) -> Result<T>,
) -> Result<T> {
    service.begin()?;
    match work(service) {
        Ok(value) => {
            service.commit().context("Failed to commit migrations")?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = service.rollback() {
                tracing::warn!(error = %rollback_err, "rollback failed");
            }
            Err(e)
        }
    }
}

/// Preview, approve and apply each version in order.
///
/// A declined version is skipped and the run continues. Returns the
/// versions that were applied.
pub fn apply_each(
    service: &MigrationService,
    versions: &[Version],
    direction: Direction,
    assume_yes: bool,
) -> Result<Vec<Version>> {
    let mut applied = Vec::new();

    for &version in versions {
        let preview = service.preview(version, direction)?;
        output::print_preview(&preview);

        if !confirm("Do you approve running this SQL on the database?", false, assume_yes)? {
            println!("{}", format!("Skipped {}", version).dimmed());
            continue;
        }

        service
            .apply(version, direction)
            .with_context(|| format!("Migration {} ({}) failed", version, direction))?;
        output::success(&format!("{} migrated {}", version, direction));
        applied.push(version);
    }

    Ok(applied)
}

/// Run every pending up migration. Shared by `up` and `init`.
pub fn run_pending_up(service: &MigrationService, assume_yes: bool) -> Result<Vec<Version>> {
    let pending = service.pending()?;
    if pending.up.is_empty() {
        output::info("There are no new migrations to run");
        return Ok(Vec::new());
    }

    println!(
        "\n{} new migration(s) will be run on the database.",
        pending.up.len().to_string().bold()
    );
    if !confirm("Are you sure you want to continue?", true, assume_yes)? {
        return Err(anyhow!("Cancelled"));
    }

    apply_each(service, &pending.up, Direction::Up, assume_yes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_settings_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("updown.json"),
            r#"{"database": "from_file.duckdb", "migrationsDir": "sql"}"#,
        )
        .unwrap();

        let args = GlobalArgs {
            project: temp_dir.path().to_path_buf(),
            database: None,
            dir: Some(PathBuf::from("/srv/migrations")),
        };
        let config = load_config(&args).unwrap();

        assert_eq!(config.migrations_dir, PathBuf::from("/srv/migrations"));
        assert_eq!(config.database, temp_dir.path().join("from_file.duckdb"));
    }
}
