//! Scaffolding for new migration files.

use crate::error::{CoreError, CoreResult};
use crate::version::{MigrationVersion, MIGRATION_FILE_PATTERN, SQL_EXTENSION, TIMESTAMP_FORMAT};
use chrono::{DateTime, Utc};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Check that `name` can be used as the suffix of a migration filename.
///
/// Names must be non-empty, carry no surrounding whitespace, and contain only
/// ASCII letters, digits, and underscores.
pub fn validate_migration_name(name: &str) -> CoreResult<()> {
    let reject = |reason: &str| {
        Err(CoreError::InvalidMigrationName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.trim() != name {
        return reject("contains leading or trailing whitespace");
    }
    if name.is_empty() {
        return reject("must not be empty");
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return reject("must contain only letters, digits, and underscores");
    }
    Ok(())
}

/// Build the filename for a migration called `name` created at `now`.
pub fn migration_file_name(name: &str, now: DateTime<Utc>) -> String {
    format!("{}_{}{}", now.format(TIMESTAMP_FORMAT), name, SQL_EXTENSION)
}

/// Initial content written into a freshly scaffolded migration.
pub fn migration_template(name: &str, timestamp: &str) -> String {
    format!(
        "-- Migration: {name}\n-- Generated: {timestamp} UTC\n\n-- Add your SQL migration here\n"
    )
}

/// Create an empty, correctly named migration file in `dir`.
///
/// The name is validated before anything touches the filesystem. `dir` is
/// created if missing. An existing file with the generated name is never
/// overwritten. Returns the path of the new file.
pub fn create_migration(dir: &Path, name: &str, now: DateTime<Utc>) -> CoreResult<PathBuf> {
    validate_migration_name(name)?;

    let file_name = migration_file_name(name, now);
    let version = MigrationVersion::from_file_name(&file_name).ok_or_else(|| {
        CoreError::InvalidMigrationFilename {
            file: file_name.clone(),
            pattern: MIGRATION_FILE_PATTERN.to_string(),
        }
    })?;

    let path = dir.join(&file_name);
    if path.exists() {
        return Err(CoreError::MigrationExists {
            path: path.display().to_string(),
        });
    }

    fs::create_dir_all(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })?;

    let io_err = |e: std::io::Error| CoreError::IoWithPath {
        path: path.display().to_string(),
        source: e,
    };
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => CoreError::MigrationExists {
                path: path.display().to_string(),
            },
            _ => io_err(e),
        })?;
    file.write_all(migration_template(name, version.timestamp()).as_bytes())
        .map_err(io_err)?;

    log::debug!("Created migration file {}", path.display());
    Ok(path)
}

#[cfg(test)]
#[path = "scaffold_test.rs"]
mod tests;
