//! Error types for the migration runner.

use sqlmig_core::{CoreError, MigrationVersion};
use sqlmig_db::DbError;
use thiserror::Error;

/// Why a run stopped.
#[derive(Error, Debug)]
pub enum MigrationError {
    /// M001: The ledger table could not be created or reached. Nothing ran.
    #[error("[M001] Migration ledger unavailable: {source}")]
    Configuration {
        #[source]
        source: DbError,
    },

    /// M002: The migrations directory failed validation. Nothing ran.
    #[error("[M002] Migration files failed validation: {source}")]
    Validation {
        #[source]
        source: CoreError,
    },

    /// M003: A migration could not be applied. Its transaction was rolled
    /// back; earlier migrations stay committed.
    #[error("[M003] Migration '{file}' failed: {cause}")]
    Execution {
        version: MigrationVersion,
        file: String,
        #[source]
        cause: ExecutionCause,
    },

    /// M004: The version was already in the ledger when recording it.
    #[error("[M004] Migration '{file}' is already recorded in schema_migrations: {source}")]
    LedgerConflict {
        version: MigrationVersion,
        file: String,
        #[source]
        source: DbError,
    },
}

/// Underlying failure of a single migration.
#[derive(Error, Debug)]
pub enum ExecutionCause {
    /// The SQL file could not be read
    #[error(transparent)]
    Read(#[from] CoreError),

    /// The file manages transactions itself; nothing in it was executed
    #[error("{statement} statements are not allowed; each migration already runs in its own transaction")]
    TransactionControl { statement: String },

    /// The database rejected a statement, or BEGIN/COMMIT failed
    #[error(transparent)]
    Database(#[from] DbError),
}

impl MigrationError {
    /// The version that failed, if the run got as far as applying files.
    pub fn failed_version(&self) -> Option<&MigrationVersion> {
        match self {
            MigrationError::Execution { version, .. }
            | MigrationError::LedgerConflict { version, .. } => Some(version),
            MigrationError::Configuration { .. } | MigrationError::Validation { .. } => None,
        }
    }
}

/// Result type alias for MigrationError
pub type RunnerResult<T> = Result<T, MigrationError>;
