//! Pull request handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use super::dto::{
    CreatePullRequest, MergePullRequest, PullRequestEnvelope, ReassignPullRequest,
    ReassignResponse,
};
use super::{ApiErr, AppState};

/// POST /pullRequest/create - create a PR and assign reviewers
pub(super) async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreatePullRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PullRequestEnvelope>), ApiErr> {
    let Json(req) = payload?;
    req.validate()?;

    let cancel = state.request_token();
    let pr = state
        .service
        .create_and_assign(
            &req.pull_request_id,
            &req.pull_request_name,
            &req.author_id,
            &cancel,
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(PullRequestEnvelope { pr: pr.into() }),
    ))
}

/// POST /pullRequest/merge
pub(super) async fn merge(
    State(state): State<AppState>,
    payload: Result<Json<MergePullRequest>, JsonRejection>,
) -> Result<Json<PullRequestEnvelope>, ApiErr> {
    let Json(req) = payload?;
    req.validate()?;

    let cancel = state.request_token();
    let pr = state.service.merge(&req.pull_request_id, &cancel).await?;
    Ok(Json(PullRequestEnvelope { pr: pr.into() }))
}

/// POST /pullRequest/reassign - swap one reviewer for a teammate
pub(super) async fn reassign(
    State(state): State<AppState>,
    payload: Result<Json<ReassignPullRequest>, JsonRejection>,
) -> Result<Json<ReassignResponse>, ApiErr> {
    let Json(req) = payload?;
    req.validate()?;

    let cancel = state.request_token();
    let result = state
        .service
        .reassign(&req.pull_request_id, &req.old_reviewer_id, &cancel)
        .await?;
    Ok(Json(ReassignResponse {
        pr: result.pull_request.into(),
        replaced_by: result.replaced_by,
    }))
}
