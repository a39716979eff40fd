//! Validate command implementation

use anyhow::Result;
use sqlmig_core::discover_migrations;

use crate::cli::{GlobalArgs, ValidateArgs};
use crate::commands::common::{resolve_settings, ExitCode};

/// Execute the validate command
pub(crate) async fn execute(args: &ValidateArgs, global: &GlobalArgs) -> Result<()> {
    let settings = resolve_settings(global, args.dir.as_deref())?;

    println!("Validating {}", settings.migrations_dir.display());

    let files = match discover_migrations(&settings.migrations_dir) {
        Ok(files) => files,
        Err(err) => {
            eprintln!("  ✗ {err}");
            let code = if err.is_validation() { 3 } else { 1 };
            return Err(ExitCode(code).into());
        }
    };

    if global.verbose {
        for file in &files {
            println!("  ✓ {}", file.version);
        }
    }
    println!("{} migration file(s) valid", files.len());
    Ok(())
}
