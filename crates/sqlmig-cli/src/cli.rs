//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// sqlmig - apply timestamped SQL migrations in order, exactly once
#[derive(Parser, Debug)]
#[command(name = "sqlmig")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Named target from the config file (also read from SQLMIG_TARGET)
    #[arg(short, long, global = true)]
    pub target: Option<String>,

    /// Database path, overriding the config file
    #[arg(short, long, global = true, env = "SQLMIG_DATABASE")]
    pub database: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply all pending migrations
    Migrate(MigrateArgs),

    /// Create a new, empty migration file
    Create(CreateArgs),

    /// Show applied, pending, and missing migrations
    Status(StatusArgs),

    /// Check migration filenames without touching the database
    Validate(ValidateArgs),
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Directory containing migration .sql files
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Migration name (letters, digits, and underscores)
    #[arg(short, long)]
    pub name: String,

    /// Directory to create the migration in
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Directory containing migration .sql files
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: StatusOutput,
}

/// Status output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutput {
    /// Aligned table
    Table,
    /// JSON array
    Json,
}

/// Arguments for the validate command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Directory containing migration .sql files
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
