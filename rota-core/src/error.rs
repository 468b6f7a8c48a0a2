//! Error types for rota
//!
//! Every failure an engine can report is a variant of [`Error`]. Callers that
//! need a coarse classification (for example to pick an HTTP status) use
//! [`Error::kind`], which is an exhaustive projection onto [`ErrorKind`].

use std::time::Duration;

use thiserror::Error;

/// Result type alias for rota operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for rota operations
#[derive(Error, Debug)]
pub enum Error {
    /// Pull request id does not resolve
    #[error("PR {0} not found")]
    PrNotFound(String),

    /// User id does not resolve
    #[error("user {0} not found")]
    UserNotFound(String),

    /// Author of a new pull request does not resolve
    #[error("author {0} not found")]
    AuthorNotFound(String),

    /// Team name does not resolve
    #[error("team {0} not found")]
    TeamNotFound(String),

    /// Caller-assigned pull request id is already taken
    #[error("PR id {0} already exists")]
    PrAlreadyExists(String),

    /// Reviewers of a merged pull request are frozen
    #[error("cannot reassign on merged PR {0}")]
    ReassigningMergedPr(String),

    /// The reviewer to replace is not reviewing the pull request
    #[error("reviewer {user_id} is not assigned to PR {pr_id}")]
    UserNotAssignedToPr { pr_id: String, user_id: String },

    /// Nobody in the team can take over the review
    #[error("no active replacement candidate in team {0}")]
    NoActiveCandidates(String),

    /// Caller cancelled the operation before it committed
    #[error("operation cancelled")]
    Cancelled,

    /// Operation did not commit within its deadline
    #[error("operation exceeded its deadline of {0:?}")]
    DeadlineExceeded(Duration),

    /// A write did not affect the rows it was required to affect
    #[error("consistency error: {0}")]
    Consistency(String),

    /// Storage backend failure
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A referenced PR, user, author or team does not exist
    NotFound,
    /// The request collides with existing state
    Conflict,
    /// The pull request is in a state that forbids the operation
    StateViolation,
    /// The reviewer set cannot be changed as requested
    AssignmentViolation,
    /// Cancelled or timed out; nothing was committed
    Cancelled,
    /// Storage, consistency or setup failure
    Internal,
}

impl Error {
    /// Wrap a backend error as [`Error::Storage`]
    pub fn storage(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Storage(err.into())
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::PrNotFound(_)
            | Error::UserNotFound(_)
            | Error::AuthorNotFound(_)
            | Error::TeamNotFound(_) => ErrorKind::NotFound,
            Error::PrAlreadyExists(_) => ErrorKind::Conflict,
            Error::ReassigningMergedPr(_) => ErrorKind::StateViolation,
            Error::UserNotAssignedToPr { .. } | Error::NoActiveCandidates(_) => {
                ErrorKind::AssignmentViolation
            }
            Error::Cancelled | Error::DeadlineExceeded(_) => ErrorKind::Cancelled,
            Error::Consistency(_) | Error::Storage(_) | Error::Config(_) | Error::Io(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// True for failures whose details must stay server-side
    pub fn is_internal(&self) -> bool {
        self.kind() == ErrorKind::Internal
    }
}
