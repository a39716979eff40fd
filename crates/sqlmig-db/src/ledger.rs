//! The `schema_migrations` ledger.
//!
//! One row per applied migration version. Rows are inserted exactly once, in
//! the same transaction that ran the migration's SQL, and are never updated or
//! deleted. A version is present iff its migration was fully committed.

use crate::duckdb::relation_exists;
use crate::error::{DbError, DbResult};
use duckdb::Connection;
use serde::Serialize;
use sqlmig_core::MigrationVersion;

/// Name of the ledger table.
pub const LEDGER_TABLE: &str = "schema_migrations";

const CREATE_LEDGER_SQL: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    version    VARCHAR PRIMARY KEY,
    applied_at TIMESTAMP NOT NULL DEFAULT current_timestamp
);";

/// One row of the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    /// Migration version (filename without `.sql`)
    pub version: String,

    /// When the row was inserted, as rendered by the database
    pub applied_at: String,
}

/// Create the ledger table if it does not exist yet.
///
/// Safe to call on every run.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    log::debug!("Ensuring ledger table {LEDGER_TABLE}");
    conn.execute_batch(CREATE_LEDGER_SQL)
        .map_err(|e| DbError::ExecutionError(format!("failed to create {LEDGER_TABLE}: {e}")))
}

/// Return whether `version` has already been recorded.
///
/// Call this on the same transaction that will apply the migration.
pub fn has(conn: &Connection, version: &MigrationVersion) -> DbResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM schema_migrations WHERE version = ?",
        duckdb::params![version.as_str()],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Record `version` as applied.
///
/// Fails with [`DbError::ConstraintViolation`] if the version is already
/// present.
pub fn record(conn: &Connection, version: &MigrationVersion) -> DbResult<()> {
    conn.execute(
        "INSERT INTO schema_migrations (version) VALUES (?)",
        duckdb::params![version.as_str()],
    )?;
    Ok(())
}

/// All ledger rows ordered by version.
///
/// Returns an empty list when the ledger table does not exist, so read-only
/// callers never have to create it.
pub fn entries(conn: &Connection) -> DbResult<Vec<LedgerEntry>> {
    if !relation_exists(conn, LEDGER_TABLE)? {
        return Ok(Vec::new());
    }

    let mut stmt = conn.prepare(
        "SELECT version, CAST(applied_at AS VARCHAR) FROM schema_migrations ORDER BY version",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(LedgerEntry {
            version: row.get(0)?,
            applied_at: row.get(1)?,
        })
    })?;
    rows.collect::<Result<Vec<_>, _>>().map_err(DbError::from)
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
