//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::ledger::{self, LedgerEntry};
use duckdb::{Connection, Transaction};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Path value that selects an in-memory database.
pub const MEMORY_PATH: &str = ":memory:";

/// DuckDB database backend
///
/// Owns a single connection. Migrations run strictly one at a time, so the
/// mutex only guards against misuse from other threads of the host.
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
    location: String,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
            location: MEMORY_PATH.to_string(),
        })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self {
            conn: Mutex::new(conn),
            location: path.display().to_string(),
        })
    }

    /// Create from path string (handles :memory: special case)
    pub fn new(path: &str) -> DbResult<Self> {
        if path == MEMORY_PATH {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(path))
        }
    }

    /// Database type identifier for logging
    pub fn db_type(&self) -> &'static str {
        "duckdb"
    }

    /// Where the database lives: a file path or `:memory:`
    pub fn location(&self) -> &str {
        &self.location
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Run `body` against the connection outside of any explicit transaction.
    pub fn with_connection<T, F>(&self, body: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        let conn = self.lock()?;
        body(&conn)
    }

    /// Execute `body` inside a transaction that commits only if `body`
    /// returns `Ok`.
    ///
    /// The transaction is rolled back when `body` fails. If `body` panics the
    /// transaction guard is dropped during unwinding, which also rolls back.
    pub fn with_transaction<T, E, F>(&self, body: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E>,
        E: From<DbError>,
    {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

        match body(&tx) {
            Ok(value) => {
                tx.commit()
                    .map_err(|e| DbError::TransactionError(format!("COMMIT failed: {e}")))?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = tx.rollback() {
                    log::warn!("ROLLBACK failed: {rollback_err}");
                }
                Err(err)
            }
        }
    }

    /// Execute multiple SQL statements in autocommit mode
    pub fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.with_connection(|conn| conn.execute_batch(sql).map_err(DbError::from))
    }

    /// Count the rows returned by `sql`
    pub fn query_count(&self, sql: &str) -> DbResult<usize> {
        self.with_connection(|conn| {
            let count: i64 = conn
                .query_row(&format!("SELECT COUNT(*) FROM ({sql})"), [], |row| {
                    row.get(0)
                })
                .map_err(|e| DbError::ExecutionError(e.to_string()))?;
            Ok(count as usize)
        })
    }

    /// Check if a table or view exists
    pub fn relation_exists(&self, name: &str) -> DbResult<bool> {
        self.with_connection(|conn| relation_exists(conn, name))
    }

    /// Create the ledger table if it does not exist yet
    pub fn ensure_ledger(&self) -> DbResult<()> {
        self.with_connection(ledger::ensure_schema)
    }

    /// All ledger rows ordered by version; empty if the ledger was never created
    pub fn ledger_entries(&self) -> DbResult<Vec<LedgerEntry>> {
        self.with_connection(ledger::entries)
    }
}

/// Check if a relation exists, handling schema-qualified names
pub(crate) fn relation_exists(conn: &Connection, name: &str) -> DbResult<bool> {
    let (schema, table) = match name.rfind('.') {
        Some(pos) => (&name[..pos], &name[pos + 1..]),
        None => ("main", name),
    };

    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM information_schema.tables WHERE table_schema = ? AND table_name = ?",
            duckdb::params![schema, table],
            |row| row.get(0),
        )
        .map_err(|e| DbError::ExecutionError(e.to_string()))?;

    Ok(count > 0)
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
