//! sqlmig-runner - Migration runner for sqlmig
//!
//! Applies the migrations found in a directory, in filename order, one
//! transaction per file, recording each applied version in the
//! `schema_migrations` ledger inside the same transaction. Already-recorded
//! versions are skipped, so re-running resumes at the first unapplied file.
//!
//! Running two migrators against the same database at the same time is not
//! supported; nothing coordinates concurrent runners.

pub mod error;
pub mod observer;
pub mod runner;
pub mod status;

pub use error::{ExecutionCause, MigrationError, RunnerResult};
pub use observer::{LogObserver, MigrationObserver, NoopObserver};
pub use runner::{migrate, MigrationReport, Migrator};
pub use status::{plan, MigrationState, MigrationStatus};
