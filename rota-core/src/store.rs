//! Storage contracts consumed by the engines
//!
//! A [`ReviewStore`] hands out transactions. Every engine operation runs all
//! of its reads and writes on one [`StoreTx`] and finishes with
//! [`StoreTx::commit`]. A transaction that is dropped without being committed
//! must roll back; this is what makes early returns, `?` propagation and
//! cancellation (dropping the operation future) leave no partial writes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::model::{PullRequestHeader, PullRequestShort, User};
use crate::Result;

/// Source of transactions over the directory and the PR store
#[async_trait]
pub trait ReviewStore: Send + Sync + 'static {
    type Tx: StoreTx;

    /// Begin a transaction that holds the store's write lock until it ends
    async fn begin(&self) -> Result<Self::Tx>;
}

/// One open transaction
///
/// Row-count results report how many rows the statement affected.
#[async_trait]
pub trait StoreTx: Send + Sized {
    /// Look up one user
    async fn get_user(&mut self, user_id: &str) -> Result<Option<User>>;

    /// All members of a team, active or not
    async fn list_team_members(&mut self, team_name: &str) -> Result<Vec<User>>;

    async fn team_exists(&mut self, team_name: &str) -> Result<bool>;

    async fn insert_team(&mut self, team_name: &str) -> Result<()>;

    /// Insert the user or overwrite its name, team and active flag
    async fn upsert_user(&mut self, user: &User) -> Result<()>;

    async fn set_user_active(&mut self, user_id: &str, is_active: bool) -> Result<u64>;

    async fn get_pull_request_header(&mut self, pr_id: &str)
        -> Result<Option<PullRequestHeader>>;

    /// Reviewer ids of a pull request in assignment order
    async fn get_reviewers(&mut self, pr_id: &str) -> Result<Vec<String>>;

    /// Insert the pull request row and its reviewer rows
    ///
    /// Must report a primary-key collision on the pull request id as
    /// [`crate::Error::PrAlreadyExists`].
    async fn insert_pull_request_with_reviewers(
        &mut self,
        header: &PullRequestHeader,
        reviewers: &[String],
    ) -> Result<()>;

    /// Add one reviewer row; an already present row affects zero rows
    async fn insert_reviewer(&mut self, pr_id: &str, user_id: &str) -> Result<u64>;

    async fn delete_reviewer(&mut self, pr_id: &str, user_id: &str) -> Result<u64>;

    /// Move an open pull request to MERGED; a merged one affects zero rows
    async fn set_merged(&mut self, pr_id: &str, merged_at: DateTime<Utc>) -> Result<u64>;

    /// Pull requests the user currently reviews, ordered by id
    async fn list_reviews_for_user(&mut self, user_id: &str) -> Result<Vec<PullRequestShort>>;

    async fn commit(self) -> Result<()>;
}
