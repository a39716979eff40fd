//! Migrate command implementation

use anyhow::{Context, Result};
use sqlmig_core::MigrationFile;
use sqlmig_runner::{MigrationError, MigrationObserver, MigrationReport, Migrator};
use std::time::Duration;

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::{exit_code_for, open_database, resolve_settings, ExitCode};
use sqlmig_db::duckdb::MEMORY_PATH;

/// Prints run progress to the terminal.
struct ConsoleObserver {
    verbose: bool,
}

impl MigrationObserver for ConsoleObserver {
    fn ledger_ready(&self) {
        if self.verbose {
            println!("  Ledger table schema_migrations ready");
        }
    }

    fn migrations_discovered(&self, files: &[MigrationFile]) {
        println!("Found {} migration file(s)\n", files.len());
    }

    fn file_skipped(&self, file: &MigrationFile) {
        if self.verbose {
            println!("  - {} (already applied)", file.version);
        }
    }

    fn file_applied(&self, file: &MigrationFile, elapsed: Duration) {
        println!("  ✓ {} [{}ms]", file.version, elapsed.as_millis());
    }

    fn run_complete(&self, report: &MigrationReport) {
        println!();
        if report.is_noop() {
            println!("Database is up to date ({} already applied)", report.skipped.len());
        } else {
            println!(
                "Applied {} migration{}, {} already applied",
                report.applied.len(),
                if report.applied.len() == 1 { "" } else { "s" },
                report.skipped.len()
            );
        }
    }

    fn run_failed(&self, error: &MigrationError) {
        eprintln!("\nMigration failed: {error}");
        if let Some(version) = error.failed_version() {
            eprintln!(
                "  {version} was rolled back and later migrations were not attempted. \
                 Fix it and re-run to resume from this file."
            );
        }
    }
}

/// Execute the migrate command
pub(crate) async fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let settings = resolve_settings(global, args.dir.as_deref())?;

    match &settings.target {
        Some(target) => println!("Migrating {} (target: {})", settings.name, target),
        None => println!("Migrating {}", settings.name),
    }
    if settings.database == MEMORY_PATH {
        eprintln!(
            "Warning: database is {MEMORY_PATH}; applied migrations are discarded on exit. \
             Set database.path in sqlmig.yml or pass --database."
        );
    }
    if global.verbose {
        println!("  Database:   {}", settings.database);
        println!("  Migrations: {}", settings.migrations_dir.display());
    }

    let verbose = global.verbose;
    let database = settings.database.clone();
    let migrations_dir = settings.migrations_dir.clone();

    // The runner is synchronous; keep it off the async worker threads.
    let outcome = tokio::task::spawn_blocking(move || -> Result<Result<MigrationReport, MigrationError>> {
        let db = open_database(&database)?;
        let observer = ConsoleObserver { verbose };
        Ok(Migrator::new(&db)
            .with_observer(&observer)
            .run(&migrations_dir))
    })
    .await
    .context("Migration worker terminated unexpectedly")??;

    match outcome {
        Ok(_) => Ok(()),
        Err(err) => Err(ExitCode(exit_code_for(&err)).into()),
    }
}
