//! sqlmig-db - Database layer for sqlmig
//!
//! This crate provides the DuckDB backend used to apply migrations and the
//! `schema_migrations` ledger that records which versions have been applied.

pub mod duckdb;
pub mod error;
pub mod ledger;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use ledger::{LedgerEntry, LEDGER_TABLE};
