//! Assignment engine: create a pull request with up to two reviewers

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, Instrument};

use super::ReviewService;
use crate::eligibility::{check_drawn_reviewers, eligible_pool};
use crate::model::{PrStatus, PullRequest, PullRequestHeader, MAX_REVIEWERS};
use crate::picker::ReviewerPicker;
use crate::store::{ReviewStore, StoreTx};
use crate::{Error, Result};

impl<S: ReviewStore, P: ReviewerPicker> ReviewService<S, P> {
    /// Create an OPEN pull request and draw its reviewers
    ///
    /// Reviewers are drawn uniformly without replacement from the author's
    /// active teammates: two if at least two are eligible, otherwise all of
    /// them. The pull request row and its reviewer rows commit together.
    ///
    /// # Errors
    /// - [`Error::PrAlreadyExists`] if `pr_id` is taken, including when a
    ///   concurrent creation of the same id commits first
    /// - [`Error::AuthorNotFound`] if `author_id` is unknown
    pub async fn create_and_assign(
        &self,
        pr_id: &str,
        title: &str,
        author_id: &str,
        cancel: &CancellationToken,
    ) -> Result<PullRequest> {
        let span = info_span!("create_and_assign", pr_id = %pr_id, author_id = %author_id);
        self.bounded(cancel, self.create_and_assign_tx(pr_id, title, author_id))
            .instrument(span)
            .await
    }

    async fn create_and_assign_tx(
        &self,
        pr_id: &str,
        title: &str,
        author_id: &str,
    ) -> Result<PullRequest> {
        let mut tx = self.store.begin().await?;

        if tx.get_pull_request_header(pr_id).await?.is_some() {
            return Err(Error::PrAlreadyExists(pr_id.to_string()));
        }

        let author = tx
            .get_user(author_id)
            .await?
            .ok_or_else(|| Error::AuthorNotFound(author_id.to_string()))?;

        let members = tx.list_team_members(&author.team_name).await?;
        let pool = eligible_pool(&members, author_id);
        let count = pool.len().min(MAX_REVIEWERS);
        let reviewers = self.picker.pick(&pool, count);
        check_drawn_reviewers(&pool, &reviewers, count).map_err(Error::Consistency)?;

        let header = PullRequestHeader {
            pr_id: pr_id.to_string(),
            title: title.to_string(),
            author_id: author_id.to_string(),
            status: PrStatus::Open,
            created_at: Utc::now(),
            merged_at: None,
        };
        tx.insert_pull_request_with_reviewers(&header, &reviewers)
            .await?;
        tx.commit().await?;

        info!(
            team = %author.team_name,
            eligible = pool.len(),
            reviewers = ?reviewers,
            "pull request created"
        );
        Ok(PullRequest::from_header(header, reviewers))
    }
}
