//! Create command implementation

use anyhow::{Context, Result};
use chrono::Utc;
use sqlmig_core::create_migration;

use crate::cli::{CreateArgs, GlobalArgs};
use crate::commands::common::resolve_settings;

/// Execute the create command
pub(crate) async fn execute(args: &CreateArgs, global: &GlobalArgs) -> Result<()> {
    let settings = resolve_settings(global, args.dir.as_deref())?;

    let path = create_migration(&settings.migrations_dir, &args.name, Utc::now())
        .with_context(|| format!("Failed to create migration '{}'", args.name))?;

    println!("Created migration file: {}", path.display());
    Ok(())
}
