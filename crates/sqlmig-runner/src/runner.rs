//! Migration runner.
//!
//! A run moves through these phases and stops at the first failure:
//!
//! 1. ensure the ledger table exists ([`MigrationError::Configuration`])
//! 2. list and validate the migrations directory ([`MigrationError::Validation`])
//! 3. for each file in filename order, open a transaction, skip it if the
//!    ledger already has its version, otherwise execute its SQL and record
//!    the version, then commit ([`MigrationError::Execution`],
//!    [`MigrationError::LedgerConflict`])
//!
//! Each file gets its own transaction. A failure in one file rolls back only
//! that file; files before it stay committed and files after it are never
//! attempted.

use crate::error::{ExecutionCause, MigrationError, RunnerResult};
use crate::observer::{LogObserver, MigrationObserver};
use serde::Serialize;
use sqlmig_core::sql_utils::{find_transaction_control, has_statements};
use sqlmig_core::{discover_migrations, CoreError, MigrationFile, MigrationVersion};
use sqlmig_db::{ledger, DbError, DuckDbBackend};
use std::path::Path;
use std::time::Instant;

/// Outcome of a successful run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Versions executed and recorded by this run, in order
    pub applied: Vec<MigrationVersion>,

    /// Versions found already recorded, in order
    pub skipped: Vec<MigrationVersion>,
}

impl MigrationReport {
    /// Number of migration files processed
    pub fn total(&self) -> usize {
        self.applied.len() + self.skipped.len()
    }

    /// True if the run executed no migration SQL
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FileOutcome {
    Applied,
    Skipped,
}

/// Failure inside a single file's transaction, before version context is attached.
#[derive(Debug)]
enum FileError {
    Read(CoreError),
    TransactionControl(String),
    Database(DbError),
    Conflict(DbError),
}

impl From<DbError> for FileError {
    fn from(err: DbError) -> Self {
        FileError::Database(err)
    }
}

impl FileError {
    fn into_migration_error(self, file: &MigrationFile) -> MigrationError {
        let version = file.version.clone();
        let file = file.version.file_name();
        match self {
            FileError::Read(e) => MigrationError::Execution {
                version,
                file,
                cause: ExecutionCause::Read(e),
            },
            FileError::TransactionControl(statement) => MigrationError::Execution {
                version,
                file,
                cause: ExecutionCause::TransactionControl { statement },
            },
            FileError::Database(e) => MigrationError::Execution {
                version,
                file,
                cause: ExecutionCause::Database(e),
            },
            FileError::Conflict(source) => MigrationError::LedgerConflict {
                version,
                file,
                source,
            },
        }
    }
}

/// Applies a migrations directory to a database.
pub struct Migrator<'a> {
    db: &'a DuckDbBackend,
    observer: &'a dyn MigrationObserver,
}

impl<'a> Migrator<'a> {
    /// Create a migrator that reports progress through the `log` facade.
    pub fn new(db: &'a DuckDbBackend) -> Self {
        Self {
            db,
            observer: &LogObserver,
        }
    }

    /// Replace the observer notified at each lifecycle point.
    pub fn with_observer(mut self, observer: &'a dyn MigrationObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Apply every unapplied migration in `dir`.
    pub fn run(&self, dir: &Path) -> RunnerResult<MigrationReport> {
        let result = self.run_phases(dir);
        match &result {
            Ok(report) => self.observer.run_complete(report),
            Err(err) => self.observer.run_failed(err),
        }
        result
    }

    fn run_phases(&self, dir: &Path) -> RunnerResult<MigrationReport> {
        self.db
            .ensure_ledger()
            .map_err(|source| MigrationError::Configuration { source })?;
        self.observer.ledger_ready();

        let files =
            discover_migrations(dir).map_err(|source| MigrationError::Validation { source })?;
        self.observer.migrations_discovered(&files);

        let mut report = MigrationReport::default();
        for file in &files {
            let started = Instant::now();
            match self.apply_file(file)? {
                FileOutcome::Skipped => {
                    self.observer.file_skipped(file);
                    report.skipped.push(file.version.clone());
                }
                FileOutcome::Applied => {
                    self.observer.file_applied(file, started.elapsed());
                    report.applied.push(file.version.clone());
                }
            }
        }
        Ok(report)
    }

    fn apply_file(&self, file: &MigrationFile) -> RunnerResult<FileOutcome> {
        self.db
            .with_transaction(|tx| -> Result<FileOutcome, FileError> {
                if ledger::has(tx, &file.version)? {
                    return Ok(FileOutcome::Skipped);
                }

                log::debug!("Running migration: {}", file.version);
                let sql = file.read_sql().map_err(FileError::Read)?;
                // A COMMIT inside the file would let the rest of it, and the
                // ledger row, escape this transaction.
                if let Some(statement) = find_transaction_control(&sql) {
                    return Err(FileError::TransactionControl(statement));
                }
                if has_statements(&sql) {
                    tx.execute_batch(&sql).map_err(DbError::from)?;
                }

                ledger::record(tx, &file.version).map_err(|e| {
                    if e.is_constraint_violation() {
                        FileError::Conflict(e)
                    } else {
                        FileError::Database(e)
                    }
                })?;
                Ok(FileOutcome::Applied)
            })
            .map_err(|e| e.into_migration_error(file))
    }
}

/// Apply every unapplied migration in `dir` to `db`, logging progress.
pub fn migrate(db: &DuckDbBackend, dir: &Path) -> RunnerResult<MigrationReport> {
    Migrator::new(db).run(dir)
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
