//! Lifecycle hooks for a migration run.

use crate::error::MigrationError;
use crate::runner::MigrationReport;
use sqlmig_core::MigrationFile;
use std::time::Duration;

/// Receives progress notifications from a [`Migrator`](crate::Migrator).
///
/// Every method has an empty default, so implementors only override what
/// they care about.
pub trait MigrationObserver {
    /// The ledger table exists.
    fn ledger_ready(&self) {}

    /// The migrations directory was listed and validated.
    fn migrations_discovered(&self, _files: &[MigrationFile]) {}

    /// `file` was already in the ledger; nothing was executed.
    fn file_skipped(&self, _file: &MigrationFile) {}

    /// `file` was executed and recorded.
    fn file_applied(&self, _file: &MigrationFile, _elapsed: Duration) {}

    /// Every file was applied or skipped.
    fn run_complete(&self, _report: &MigrationReport) {}

    /// The run stopped at `error`.
    fn run_failed(&self, _error: &MigrationError) {}
}

/// Forwards lifecycle events to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl MigrationObserver for LogObserver {
    fn ledger_ready(&self) {
        log::debug!("Migration ledger ready");
    }

    fn migrations_discovered(&self, files: &[MigrationFile]) {
        log::debug!("Discovered {} migration(s)", files.len());
    }

    fn file_skipped(&self, file: &MigrationFile) {
        log::info!("Migration {} already applied, skipping", file.version);
    }

    fn file_applied(&self, file: &MigrationFile, elapsed: Duration) {
        log::info!(
            "Migration {} applied in {}ms",
            file.version,
            elapsed.as_millis()
        );
    }

    fn run_complete(&self, report: &MigrationReport) {
        log::info!(
            "All migrations completed successfully ({} applied, {} skipped)",
            report.applied.len(),
            report.skipped.len()
        );
    }

    fn run_failed(&self, error: &MigrationError) {
        log::error!("{error}");
    }
}

/// Ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl MigrationObserver for NoopObserver {}
