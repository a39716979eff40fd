//! Error types for sqlmig-core

use thiserror::Error;

/// Core error type for sqlmig
#[derive(Error, Debug)]
pub enum CoreError {
    /// C001: Configuration file not found
    #[error("[C001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// C002: Invalid configuration value
    #[error("[C002] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// C003: Migrations directory could not be listed
    #[error("[C003] Cannot read migrations directory '{path}': {source}")]
    MigrationsDirUnreadable {
        path: String,
        source: std::io::Error,
    },

    /// C004: A `.sql` file in the migrations directory breaks the naming convention
    #[error("[C004] Invalid migration filename '{file}': expected pattern {pattern}")]
    InvalidMigrationFilename { file: String, pattern: String },

    /// C005: Rejected name for a new migration
    #[error("[C005] Invalid migration name '{name}': {reason}")]
    InvalidMigrationName { name: String, reason: String },

    /// C006: Refusing to overwrite an existing migration file
    #[error("[C006] Migration file already exists: {path}")]
    MigrationExists { path: String },

    /// C007: IO error with file path context
    #[error("[C007] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// C008: YAML parse error
    #[error("[C008] Config parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

impl CoreError {
    /// Returns true for errors raised by the filename validator.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CoreError::MigrationsDirUnreadable { .. } | CoreError::InvalidMigrationFilename { .. }
        )
    }
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
