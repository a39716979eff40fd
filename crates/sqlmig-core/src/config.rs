//! Configuration types and parsing for sqlmig.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Config filenames searched for in a project directory, in priority order.
pub const CONFIG_FILE_NAMES: [&str; 2] = ["sqlmig.yml", "sqlmig.yaml"];

/// Environment variable consulted by [`Config::resolve_target`].
pub const TARGET_ENV_VAR: &str = "SQLMIG_TARGET";

const DEFAULT_DB_PATH: &str = ":memory:";

/// Main project configuration from sqlmig.yml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Project name, used only in output
    #[serde(default = "default_name")]
    pub name: String,

    /// Directory holding the migration `.sql` files, relative to the project root
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Named target configurations (e.g., dev, staging, prod)
    #[serde(default)]
    pub targets: HashMap<String, TargetConfig>,
}

/// Target-specific configuration overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Database configuration override
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Migrations directory override
    #[serde(default)]
    pub migrations_dir: Option<String>,
}

/// Database connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// DuckDB file path, or `:memory:`
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            name: default_name(),
            migrations_dir: default_migrations_dir(),
            database: DatabaseConfig::default(),
            targets: HashMap::new(),
        }
    }
}

fn default_name() -> String {
    "sqlmig".to_string()
}

fn default_migrations_dir() -> String {
    "migrations".to_string()
}

fn default_db_path() -> String {
    DEFAULT_DB_PATH.to_string()
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory
    /// Looks for sqlmig.yml or sqlmig.yaml
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        match CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
        {
            Some(path) => Self::load(&path),
            None => Err(CoreError::ConfigNotFound {
                path: dir.join(CONFIG_FILE_NAMES[0]).display().to_string(),
            }),
        }
    }

    /// Validate the configuration
    fn validate(&self) -> CoreResult<()> {
        if self.migrations_dir.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migrations_dir cannot be empty".to_string(),
            });
        }

        let databases = std::iter::once(("database", Some(&self.database))).chain(
            self.targets
                .values()
                .map(|tc| ("targets.*.database", tc.database.as_ref())),
        );
        for (field, db) in databases {
            if db.is_some_and(|db| db.path.trim().is_empty()) {
                return Err(CoreError::ConfigInvalid {
                    message: format!("{field}.path cannot be empty"),
                });
            }
        }

        for (name, tc) in &self.targets {
            if tc
                .migrations_dir
                .as_deref()
                .is_some_and(|dir| dir.trim().is_empty())
            {
                return Err(CoreError::ConfigInvalid {
                    message: format!("targets.{name}.migrations_dir cannot be empty"),
                });
            }
        }

        Ok(())
    }

    /// Get the list of available target names, sorted
    pub fn available_targets(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.targets.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    fn require_target(&self, name: &str) -> CoreResult<&TargetConfig> {
        self.targets
            .get(name)
            .ok_or_else(|| CoreError::ConfigInvalid {
                message: format!(
                    "Target '{}' not found. Available targets: {}",
                    name,
                    self.available_targets().join(", ")
                ),
            })
    }

    /// Get database configuration, optionally applying target overrides
    pub fn get_database_config(&self, target: Option<&str>) -> CoreResult<DatabaseConfig> {
        match target {
            Some(name) => Ok(self
                .require_target(name)?
                .database
                .clone()
                .unwrap_or_else(|| self.database.clone())),
            None => Ok(self.database.clone()),
        }
    }

    /// Get the absolute migrations directory, optionally applying target overrides
    pub fn migrations_dir_absolute(&self, root: &Path, target: Option<&str>) -> CoreResult<PathBuf> {
        let dir: &str = match target {
            Some(name) => self
                .require_target(name)?
                .migrations_dir
                .as_deref()
                .unwrap_or(&self.migrations_dir),
            None => &self.migrations_dir,
        };
        Ok(root.join(dir))
    }

    /// Resolve target from CLI flag or SQLMIG_TARGET environment variable
    ///
    /// Priority: CLI flag > SQLMIG_TARGET env var > None
    pub fn resolve_target(cli_target: Option<&str>) -> Option<String> {
        cli_target
            .map(String::from)
            .or_else(|| std::env::var(TARGET_ENV_VAR).ok())
            .filter(|t| !t.is_empty())
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
