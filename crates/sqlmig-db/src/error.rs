//! Error types for sqlmig-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Primary key or unique constraint violated (D003)
    #[error("[D003] Constraint violated: {0}")]
    ConstraintViolation(String),

    /// BEGIN / COMMIT failure (D004)
    #[error("[D004] Transaction failed: {0}")]
    TransactionError(String),

    /// Mutex poisoned (D005)
    #[error("[D005] Database mutex poisoned: {0}")]
    MutexPoisoned(String),
}

impl DbError {
    /// Returns true if the error is a uniqueness / primary key violation.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, DbError::ConstraintViolation(_))
    }
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        // duckdb::Error does not expose structured constraint variants, so
        // classify by message text.
        let msg = err.to_string();
        if msg.contains("Duplicate key")
            || msg.contains("violates primary key constraint")
            || msg.contains("violates unique constraint")
            || msg.contains("PRIMARY KEY or UNIQUE constraint violated")
        {
            DbError::ConstraintViolation(msg)
        } else {
            DbError::ExecutionError(msg)
        }
    }
}
