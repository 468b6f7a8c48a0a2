//! User handlers

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;

use super::dto::{SetIsActiveRequest, UserEnvelope, UserQuery, UserReviewsResponse};
use super::{ApiErr, AppState};

/// POST /users/setIsActive
pub(super) async fn set_is_active(
    State(state): State<AppState>,
    payload: Result<Json<SetIsActiveRequest>, JsonRejection>,
) -> Result<Json<UserEnvelope>, ApiErr> {
    let Json(req) = payload?;
    let is_active = req.validate()?;

    let cancel = state.request_token();
    let user = state
        .service
        .set_user_active(&req.user_id, is_active, &cancel)
        .await?;
    Ok(Json(UserEnvelope { user: user.into() }))
}

/// GET /users/getReview?user_id= - pull requests the user reviews
pub(super) async fn get_review(
    State(state): State<AppState>,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<UserReviewsResponse>, ApiErr> {
    let Query(query) = query?;
    if query.user_id.trim().is_empty() {
        return Err(ApiErr::invalid_input("user_id is required"));
    }

    let cancel = state.request_token();
    let reviews = state
        .service
        .get_user_reviews(&query.user_id, &cancel)
        .await?;
    Ok(Json(UserReviewsResponse {
        user_id: query.user_id,
        pull_requests: reviews.into_iter().map(Into::into).collect(),
    }))
}
