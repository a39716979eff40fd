//! Strongly-typed migration version.
//!
//! A version is a migration filename without its `.sql` extension, e.g.
//! `20230101120000_initial_schema`. The fixed-width, zero-padded timestamp
//! prefix makes plain string ordering equal to chronological ordering.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::OnceLock;

/// File extension recognized as a migration.
pub const SQL_EXTENSION: &str = ".sql";

/// Width of the `YYYYMMDDHHMMSS` prefix.
pub const TIMESTAMP_LEN: usize = 14;

/// `chrono` format string producing the timestamp prefix.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Filename pattern every migration must match, as shown in error messages.
pub const MIGRATION_FILE_PATTERN: &str = r"^[0-9]{14}_[A-Za-z0-9_]+\.sql$";

const VERSION_PATTERN: &str = r"^[0-9]{14}_[A-Za-z0-9_]+$";

static VERSION_RE: OnceLock<Regex> = OnceLock::new();

fn version_regex() -> &'static Regex {
    VERSION_RE.get_or_init(|| Regex::new(VERSION_PATTERN).expect("valid regex literal"))
}

/// Strongly-typed wrapper for migration versions.
///
/// Only constructible from strings matching `^[0-9]{14}_[A-Za-z0-9_]+$`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MigrationVersion(String);

impl<'de> Deserialize<'de> for MigrationVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MigrationVersion::try_new(s.clone()).ok_or_else(|| {
            serde::de::Error::custom(format!("'{s}' is not a valid migration version"))
        })
    }
}

impl MigrationVersion {
    /// Try to create a version, returning `None` if it breaks the naming convention.
    pub fn try_new(version: impl Into<String>) -> Option<Self> {
        let s = version.into();
        if version_regex().is_match(&s) {
            Some(Self(s))
        } else {
            None
        }
    }

    /// Derive a version from a migration filename such as `20230101120000_init.sql`.
    ///
    /// Returns `None` unless the name matches [`MIGRATION_FILE_PATTERN`] exactly.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        file_name
            .strip_suffix(SQL_EXTENSION)
            .and_then(Self::try_new)
    }

    /// The 14-digit `YYYYMMDDHHMMSS` prefix.
    pub fn timestamp(&self) -> &str {
        &self.0[..TIMESTAMP_LEN]
    }

    /// The human-readable suffix after the timestamp and underscore.
    pub fn name(&self) -> &str {
        &self.0[TIMESTAMP_LEN + 1..]
    }

    /// The filename this version was derived from.
    pub fn file_name(&self) -> String {
        format!("{}{}", self.0, SQL_EXTENSION)
    }

    /// Return the underlying version as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for MigrationVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MigrationVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for MigrationVersion {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for MigrationVersion {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for MigrationVersion {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for MigrationVersion {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
