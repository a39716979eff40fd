//! sqlmig-core - Core library for sqlmig
//!
//! This crate provides configuration parsing, the migration filename
//! convention, discovery and validation of migration directories, and
//! scaffolding of new migration files. Nothing here touches a database.

pub mod config;
pub mod discovery;
pub mod error;
pub mod scaffold;
pub mod sql_utils;
pub mod version;

pub use config::{Config, DatabaseConfig, TargetConfig};
pub use discovery::{discover_migrations, MigrationFile};
pub use error::{CoreError, CoreResult};
pub use scaffold::create_migration;
pub use version::MigrationVersion;
