//! Rota Core - reviewer assignment for pull requests
//!
//! This crate holds the domain model and the engines that pick reviewers for
//! new pull requests, swap reviewers on open ones and merge them. Storage is
//! reached through the [`store`] traits; `rota-db` provides the SQLite
//! implementation.

pub mod config;
pub mod eligibility;
pub mod error;
pub mod model;
pub mod picker;
pub mod service;
pub mod store;

pub use config::{CliOverrides, Config};
pub use error::{Error, ErrorKind, Result};
pub use model::{
    PrStatus, PullRequest, PullRequestHeader, PullRequestShort, Reassignment, Team, TeamMember,
    TeamUpsert, User, MAX_REVIEWERS,
};
pub use picker::{RandomPicker, ReviewerPicker};
pub use service::ReviewService;
pub use store::{ReviewStore, StoreTx};
pub use tokio_util::sync::CancellationToken;
