//! Migration directory discovery and filename validation.
//!
//! [`discover_migrations`] lists a directory, keeps every non-directory entry
//! ending in `.sql`, and validates each name against the migration filename
//! convention. A single bad name fails the whole listing so that a malformed
//! set never runs in an unpredictable order.

use crate::error::{CoreError, CoreResult};
use crate::version::{MigrationVersion, MIGRATION_FILE_PATTERN, SQL_EXTENSION};
use std::fs;
use std::path::{Path, PathBuf};

/// One migration file found on disk.
///
/// The SQL content is not loaded until [`MigrationFile::read_sql`] is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
    /// Filename without extension
    pub version: MigrationVersion,

    /// Full path to the `.sql` file
    pub path: PathBuf,
}

impl MigrationFile {
    /// The `YYYYMMDDHHMMSS` ordering key.
    pub fn timestamp(&self) -> &str {
        self.version.timestamp()
    }

    /// The human-readable part of the filename.
    pub fn name(&self) -> &str {
        self.version.name()
    }

    /// Read the full SQL text of this migration.
    pub fn read_sql(&self) -> CoreResult<String> {
        fs::read_to_string(&self.path).map_err(|e| CoreError::IoWithPath {
            path: self.path.display().to_string(),
            source: e,
        })
    }
}

/// Discover, validate, and sort the migrations in `dir`.
///
/// Subdirectories and files with other extensions are skipped. Candidates are
/// checked in sorted filename order, so the reported offender is the same on
/// every run. An empty directory yields an empty list.
pub fn discover_migrations(dir: &Path) -> CoreResult<Vec<MigrationFile>> {
    let unreadable = |e: std::io::Error| CoreError::MigrationsDirUnreadable {
        path: dir.display().to_string(),
        source: e,
    };

    let mut candidates: Vec<(String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let path = entry.path();
        if path.is_dir() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if file_name.ends_with(SQL_EXTENSION) {
            candidates.push((file_name, path));
        }
    }

    candidates.sort_by(|a, b| a.0.cmp(&b.0));
    log::debug!(
        "Found {} migration file(s) in {}",
        candidates.len(),
        dir.display()
    );

    candidates
        .into_iter()
        .map(|(file_name, path)| {
            let version = MigrationVersion::from_file_name(&file_name).ok_or_else(|| {
                CoreError::InvalidMigrationFilename {
                    file: file_name.clone(),
                    pattern: MIGRATION_FILE_PATTERN.to_string(),
                }
            })?;
            Ok(MigrationFile { version, path })
        })
        .collect()
}

#[cfg(test)]
#[path = "discovery_test.rs"]
mod tests;
