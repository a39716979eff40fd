//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use sqlmig_core::{Config, CoreError};
use sqlmig_db::duckdb::MEMORY_PATH;
use sqlmig_db::DuckDbBackend;
use sqlmig_runner::MigrationError;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// A failure the command already reported; `main` exits with this code.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Intentionally empty: the command already printed its own report.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Exit code for a failed run, so automation can tell failures apart.
///
/// 1: ledger unreachable, 3: invalid migration files, 4: a migration failed.
pub(crate) fn exit_code_for(err: &MigrationError) -> i32 {
    match err {
        MigrationError::Configuration { .. } => 1,
        MigrationError::Validation { .. } => 3,
        MigrationError::Execution { .. } | MigrationError::LedgerConflict { .. } => 4,
    }
}

/// Everything a command needs after config, target, and flag overrides are applied.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    /// Project name from config
    pub name: String,
    /// Resolved target, if any
    pub target: Option<String>,
    /// Directory holding migration files
    pub migrations_dir: PathBuf,
    /// DuckDB path or `:memory:`
    pub database: String,
}

/// Load the project config, falling back to defaults when no config file exists.
///
/// An explicit `--config` path must exist.
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    if let Some(path) = &global.config {
        return Config::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()));
    }

    match Config::load_from_dir(&global.project_dir) {
        Ok(config) => Ok(config),
        Err(CoreError::ConfigNotFound { path }) => {
            log::debug!("No config at {path}, using defaults");
            Ok(Config::default())
        }
        Err(e) => Err(e).context("Failed to load project config"),
    }
}

/// Resolve settings for a command.
///
/// Priority for the database: `--database`/`SQLMIG_DATABASE` > target > config.
/// Priority for the directory: `dir_override` > target > config. Paths from
/// the config file are relative to the project directory; paths given on the
/// command line are used as given.
pub(crate) fn resolve_settings(global: &GlobalArgs, dir_override: Option<&Path>) -> Result<Settings> {
    let config = load_config(global)?;
    let target = Config::resolve_target(global.target.as_deref());
    let root = &global.project_dir;

    let migrations_dir = match dir_override {
        Some(dir) => dir.to_path_buf(),
        None => config.migrations_dir_absolute(root, target.as_deref())?,
    };

    let database = match &global.database {
        Some(path) => path.clone(),
        None => {
            let path = config.get_database_config(target.as_deref())?.path;
            resolve_db_path(root, &path)
        }
    };

    Ok(Settings {
        name: config.name,
        target,
        migrations_dir,
        database,
    })
}

/// Join a config-relative database path onto the project root.
fn resolve_db_path(root: &Path, path: &str) -> String {
    if path == MEMORY_PATH || Path::new(path).is_absolute() {
        path.to_string()
    } else {
        root.join(path).display().to_string()
    }
}

/// Open the database, creating parent directories for file databases.
pub(crate) fn open_database(path: &str) -> Result<DuckDbBackend> {
    if path != MEMORY_PATH {
        if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }
    DuckDbBackend::new(path).with_context(|| format!("Failed to open database: {path}"))
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;
