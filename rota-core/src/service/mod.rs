//! Review service: reviewer assignment, reassignment and merge engines
//!
//! [`ReviewService`] is the entry point the API layer calls. Each operation
//! takes already-validated, non-empty identifiers and a cancellation token,
//! runs inside exactly one store transaction and returns either the result or
//! a typed [`Error`].
//!
//! Operations are bounded by the configured operation timeout. When the token
//! fires or the deadline passes, the in-flight future is dropped together
//! with its uncommitted transaction, so nothing is written.

mod assign;
mod directory;
mod merge;
mod reassign;

use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::config::EngineSettings;
use crate::picker::{RandomPicker, ReviewerPicker};
use crate::store::ReviewStore;
use crate::{Error, ErrorKind, Result};

/// Reviewer assignment engines over a transactional store
pub struct ReviewService<S, P = RandomPicker> {
    store: S,
    picker: P,
    operation_timeout: Duration,
}

impl<S: ReviewStore> ReviewService<S, RandomPicker> {
    /// Create a service drawing reviewers with an entropy-seeded picker
    pub fn new(store: S) -> Self {
        Self::with_picker(store, RandomPicker::new())
    }
}

impl<S: ReviewStore, P: ReviewerPicker> ReviewService<S, P> {
    /// Create a service with an explicit reviewer picker
    pub fn with_picker(store: S, picker: P) -> Self {
        Self {
            store,
            picker,
            operation_timeout: EngineSettings::default().operation_timeout,
        }
    }

    /// Apply engine settings
    pub fn with_settings(mut self, settings: &EngineSettings) -> Self {
        self.operation_timeout = settings.operation_timeout;
        self
    }

    /// Set the per-operation deadline
    pub fn with_operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Get the underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the per-operation deadline
    pub fn operation_timeout(&self) -> Duration {
        self.operation_timeout
    }

    /// Run one transactional operation under the token and the deadline
    async fn bounded<T, F>(&self, cancel: &CancellationToken, operation: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(Error::Cancelled),
            outcome = tokio::time::timeout(self.operation_timeout, operation) => match outcome {
                Ok(result) => result,
                Err(_) => Err(Error::DeadlineExceeded(self.operation_timeout)),
            },
        };

        if let Err(err) = &result {
            match err.kind() {
                ErrorKind::Internal => error!(error = ?err, "operation failed, rolled back"),
                ErrorKind::Cancelled => warn!(error = %err, "operation abandoned, rolled back"),
                _ => debug!(error = %err, "operation rejected"),
            }
        }

        result
    }
}

/// Require a write to have touched exactly one row
fn expect_single_row(statement: &str, affected: u64) -> Result<()> {
    if affected == 1 {
        Ok(())
    } else {
        Err(Error::Consistency(format!(
            "{} affected {} rows, expected 1",
            statement, affected
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expect_single_row() {
        assert!(expect_single_row("insert reviewer", 1).is_ok());
        let err = expect_single_row("delete reviewer", 0).unwrap_err();
        assert!(err.is_internal());
        assert_eq!(
            err.to_string(),
            "consistency error: delete reviewer affected 0 rows, expected 1"
        );
        assert!(expect_single_row("delete reviewer", 2).is_err());
    }
}
