//! Status command implementation

use anyhow::{Context, Result};
use sqlmig_runner::{plan, MigrationState, MigrationStatus};
use std::path::Path;

use crate::cli::{GlobalArgs, StatusArgs, StatusOutput};
use crate::commands::common::{exit_code_for, open_database, resolve_settings, ExitCode};
use sqlmig_db::duckdb::MEMORY_PATH;

/// Execute the status command
pub(crate) async fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let settings = resolve_settings(global, args.dir.as_deref())?;

    // A missing database file means nothing is applied; don't create it.
    let database = if settings.database != MEMORY_PATH && !Path::new(&settings.database).exists() {
        log::debug!("Database {} does not exist yet", settings.database);
        MEMORY_PATH
    } else {
        settings.database.as_str()
    };
    let db = open_database(database)?;

    let statuses = match plan(&db, &settings.migrations_dir) {
        Ok(statuses) => statuses,
        Err(err) => {
            eprintln!("{err}");
            return Err(ExitCode(exit_code_for(&err)).into());
        }
    };

    match args.output {
        StatusOutput::Json => {
            let json =
                serde_json::to_string_pretty(&statuses).context("Failed to serialize status")?;
            println!("{json}");
        }
        StatusOutput::Table => print_table(&statuses),
    }
    Ok(())
}

fn print_table(statuses: &[MigrationStatus]) {
    if statuses.is_empty() {
        println!("No migrations found.");
        return;
    }

    let width = statuses
        .iter()
        .map(|s| s.version.len())
        .max()
        .unwrap_or(0)
        .max("VERSION".len());

    println!("{:<width$}  {:<8}  APPLIED AT", "VERSION", "STATE");
    for status in statuses {
        println!(
            "{:<width$}  {:<8}  {}",
            status.version,
            status.state.to_string(),
            status.applied_at.as_deref().unwrap_or("-"),
        );
    }

    let count = |state: MigrationState| statuses.iter().filter(|s| s.state == state).count();
    println!(
        "\n{} applied, {} pending, {} missing",
        count(MigrationState::Applied),
        count(MigrationState::Pending),
        count(MigrationState::Missing)
    );
}
