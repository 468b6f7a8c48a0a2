//! Reassignment engine: swap one reviewer for an eligible teammate

use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, Instrument};

use super::{expect_single_row, ReviewService};
use crate::eligibility::first_candidate;
use crate::model::{PrStatus, PullRequest, Reassignment};
use crate::picker::ReviewerPicker;
use crate::store::{ReviewStore, StoreTx};
use crate::{Error, Result};

impl<S: ReviewStore, P: ReviewerPicker> ReviewService<S, P> {
    /// Replace `old_reviewer_id` on `pr_id` with another active teammate
    ///
    /// The replacement is the lowest user id (byte order) among active
    /// members of the old reviewer's team that are neither the author, the
    /// old reviewer, nor already reviewing. The swap inserts the new reviewer
    /// row and deletes the old one; each must affect exactly one row or the
    /// whole transaction rolls back.
    ///
    /// # Errors
    /// Checked in this order:
    /// 1. [`Error::PrNotFound`]
    /// 2. [`Error::UserNotFound`] for the old reviewer
    /// 3. [`Error::ReassigningMergedPr`]
    /// 4. [`Error::UserNotAssignedToPr`]
    /// 5. [`Error::NoActiveCandidates`]
    pub async fn reassign(
        &self,
        pr_id: &str,
        old_reviewer_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Reassignment> {
        let span = info_span!("reassign", pr_id = %pr_id, old_reviewer_id = %old_reviewer_id);
        self.bounded(cancel, self.reassign_tx(pr_id, old_reviewer_id))
            .instrument(span)
            .await
    }

    async fn reassign_tx(&self, pr_id: &str, old_reviewer_id: &str) -> Result<Reassignment> {
        let mut tx = self.store.begin().await?;

        let header = tx
            .get_pull_request_header(pr_id)
            .await?
            .ok_or_else(|| Error::PrNotFound(pr_id.to_string()))?;
        let old_reviewer = tx
            .get_user(old_reviewer_id)
            .await?
            .ok_or_else(|| Error::UserNotFound(old_reviewer_id.to_string()))?;

        if header.status != PrStatus::Open {
            return Err(Error::ReassigningMergedPr(pr_id.to_string()));
        }

        let reviewers = tx.get_reviewers(pr_id).await?;
        if !reviewers.iter().any(|id| id == old_reviewer_id) {
            return Err(Error::UserNotAssignedToPr {
                pr_id: pr_id.to_string(),
                user_id: old_reviewer_id.to_string(),
            });
        }

        let members = tx.list_team_members(&old_reviewer.team_name).await?;
        let replacement = first_candidate(&members, &header.author_id, old_reviewer_id, &reviewers)
            .ok_or_else(|| Error::NoActiveCandidates(old_reviewer.team_name.clone()))?;

        let inserted = tx.insert_reviewer(pr_id, &replacement).await?;
        expect_single_row("insert of new reviewer", inserted)?;
        let deleted = tx.delete_reviewer(pr_id, old_reviewer_id).await?;
        expect_single_row("delete of old reviewer", deleted)?;
        tx.commit().await?;

        info!(replaced_by = %replacement, "reviewer reassigned");

        let after: Vec<String> = reviewers
            .into_iter()
            .filter(|id| id != old_reviewer_id)
            .chain(std::iter::once(replacement.clone()))
            .collect();
        Ok(Reassignment {
            pull_request: PullRequest::from_header(header, after),
            replaced_by: replacement,
        })
    }
}
