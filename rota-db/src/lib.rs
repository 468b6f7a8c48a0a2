//! Rota Database - SQLite persistence layer
//!
//! This crate provides the SQLite-backed review store: connection setup,
//! schema migrations and the transactional [`SqliteStore`] used by
//! `rota_core::ReviewService`.

pub mod db;
pub mod error;
pub mod store;

pub use db::{Database, DatabaseConfig};
pub use error::{DbError, Result};
pub use store::{SqliteStore, SqliteTx};
