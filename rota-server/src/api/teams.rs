//! Team directory handlers

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::dto::{TeamEnvelope, TeamQuery, TeamRequest};
use super::{ApiErr, AppState};

/// POST /team/add - create a team or upsert its members
///
/// 201 when the team is new, 200 when it already existed.
pub(super) async fn add(
    State(state): State<AppState>,
    payload: Result<Json<TeamRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TeamEnvelope>), ApiErr> {
    let Json(req) = payload?;
    req.validate()?;

    let cancel = state.request_token();
    let upsert = state.service.upsert_team(&req.into_team(), &cancel).await?;

    let status = if upsert.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(TeamEnvelope {
            team: upsert.team.into(),
        }),
    ))
}

/// GET /team/get?team_name=
pub(super) async fn get(
    State(state): State<AppState>,
    query: Result<Query<TeamQuery>, QueryRejection>,
) -> Result<Json<TeamEnvelope>, ApiErr> {
    let Query(query) = query?;
    if query.team_name.trim().is_empty() {
        return Err(ApiErr::invalid_input("team_name is required"));
    }

    let cancel = state.request_token();
    let team = state.service.get_team(&query.team_name, &cancel).await?;
    Ok(Json(TeamEnvelope { team: team.into() }))
}
