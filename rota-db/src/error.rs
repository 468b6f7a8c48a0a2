//! Error types for database setup

use thiserror::Error;

/// Database error types
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx database error
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DbError> for rota_core::Error {
    fn from(err: DbError) -> Self {
        rota_core::Error::storage(err)
    }
}

/// Result type alias for database setup
pub type Result<T> = std::result::Result<T, DbError>;
