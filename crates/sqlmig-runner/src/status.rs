//! Read-only comparison of a migrations directory against the ledger.

use crate::error::{MigrationError, RunnerResult};
use serde::Serialize;
use sqlmig_core::discover_migrations;
use sqlmig_db::DuckDbBackend;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Where a migration stands relative to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationState {
    /// File exists and its version is recorded
    Applied,
    /// File exists but has not been applied
    Pending,
    /// Version is recorded but no file matches it any more
    Missing,
}

impl fmt::Display for MigrationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationState::Applied => write!(f, "applied"),
            MigrationState::Pending => write!(f, "pending"),
            MigrationState::Missing => write!(f, "missing"),
        }
    }
}

/// Status of one migration version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationStatus {
    pub version: String,
    pub state: MigrationState,
    pub applied_at: Option<String>,
}

/// List every known version, ordered by version, with its state.
///
/// Neither creates the ledger table nor executes migration SQL.
pub fn plan(db: &DuckDbBackend, dir: &Path) -> RunnerResult<Vec<MigrationStatus>> {
    let files = discover_migrations(dir).map_err(|source| MigrationError::Validation { source })?;
    let entries = db
        .ledger_entries()
        .map_err(|source| MigrationError::Configuration { source })?;

    let mut statuses: BTreeMap<String, MigrationStatus> = BTreeMap::new();
    for file in files {
        let version = file.version.into_inner();
        statuses.insert(
            version.clone(),
            MigrationStatus {
                version,
                state: MigrationState::Pending,
                applied_at: None,
            },
        );
    }

    for entry in entries {
        let status = statuses
            .entry(entry.version.clone())
            .or_insert_with(|| MigrationStatus {
                version: entry.version,
                state: MigrationState::Missing,
                applied_at: None,
            });
        if status.state == MigrationState::Pending {
            status.state = MigrationState::Applied;
        }
        status.applied_at = Some(entry.applied_at);
    }

    Ok(statuses.into_values().collect())
}
