//! Merge engine

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, info_span, Instrument};

use super::{expect_single_row, ReviewService};
use crate::model::{PrStatus, PullRequest};
use crate::picker::ReviewerPicker;
use crate::store::{ReviewStore, StoreTx};
use crate::{Error, Result};

impl<S: ReviewStore, P: ReviewerPicker> ReviewService<S, P> {
    /// Mark a pull request MERGED
    ///
    /// Merging an already merged pull request returns it unchanged; the
    /// first `merged_at` is kept.
    pub async fn merge(&self, pr_id: &str, cancel: &CancellationToken) -> Result<PullRequest> {
        let span = info_span!("merge", pr_id = %pr_id);
        self.bounded(cancel, self.merge_tx(pr_id))
            .instrument(span)
            .await
    }

    async fn merge_tx(&self, pr_id: &str) -> Result<PullRequest> {
        let mut tx = self.store.begin().await?;

        let mut header = tx
            .get_pull_request_header(pr_id)
            .await?
            .ok_or_else(|| Error::PrNotFound(pr_id.to_string()))?;
        let reviewers = tx.get_reviewers(pr_id).await?;

        if header.status == PrStatus::Merged {
            debug!("pull request already merged");
            return Ok(PullRequest::from_header(header, reviewers));
        }

        let merged_at = Utc::now();
        let changed = tx.set_merged(pr_id, merged_at).await?;
        expect_single_row("merge of pull request", changed)?;
        tx.commit().await?;

        info!("pull request merged");
        header.status = PrStatus::Merged;
        header.merged_at = Some(merged_at);
        Ok(PullRequest::from_header(header, reviewers))
    }

    /// Load a pull request with its current reviewers
    pub async fn get_pull_request(
        &self,
        pr_id: &str,
        cancel: &CancellationToken,
    ) -> Result<PullRequest> {
        let span = info_span!("get_pull_request", pr_id = %pr_id);
        self.bounded(cancel, async {
            let mut tx = self.store.begin().await?;
            let header = tx
                .get_pull_request_header(pr_id)
                .await?
                .ok_or_else(|| Error::PrNotFound(pr_id.to_string()))?;
            let reviewers = tx.get_reviewers(pr_id).await?;
            tx.commit().await?;
            Ok(PullRequest::from_header(header, reviewers))
        })
        .instrument(span)
        .await
    }
}
