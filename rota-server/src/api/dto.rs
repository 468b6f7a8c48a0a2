//! Request and response bodies
//!
//! Field names follow the public wire format (`pull_request_id`,
//! `assigned_reviewers`, `createdAt`, ...). Required string fields default
//! to empty on decode so that a missing field and an empty one are reported
//! the same way by `validate()`.

use chrono::{DateTime, Utc};
use rota_core::{PrStatus, PullRequest, PullRequestShort, Team, TeamMember, User};
use serde::{Deserialize, Serialize};

use super::error::ApiErr;

fn require(field: &str, value: &str) -> Result<(), ApiErr> {
    if value.trim().is_empty() {
        Err(ApiErr::invalid_input(format!("{} is required", field)))
    } else {
        Ok(())
    }
}

// ── Requests ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TeamMemberRequest {
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub username: String,
    pub is_active: Option<bool>,
}

/// Body of `POST /team/add`
#[derive(Debug, Deserialize)]
pub struct TeamRequest {
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub members: Vec<TeamMemberRequest>,
}

impl TeamRequest {
    pub fn validate(&self) -> Result<(), ApiErr> {
        require("team_name", &self.team_name)?;
        if self.members.is_empty() {
            return Err(ApiErr::invalid_input("members must not be empty"));
        }
        for member in &self.members {
            require("members[].user_id", &member.user_id)?;
            require("members[].username", &member.username)?;
            if member.is_active.is_none() {
                return Err(ApiErr::invalid_input("members[].is_active is required"));
            }
        }
        Ok(())
    }

    pub fn into_team(self) -> Team {
        Team {
            team_name: self.team_name,
            members: self
                .members
                .into_iter()
                .map(|m| TeamMember {
                    user_id: m.user_id,
                    username: m.username,
                    is_active: m.is_active.unwrap_or(true),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TeamQuery {
    #[serde(default)]
    pub team_name: String,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    #[serde(default)]
    pub user_id: String,
}

/// Body of `POST /users/setIsActive`
#[derive(Debug, Deserialize)]
pub struct SetIsActiveRequest {
    #[serde(default)]
    pub user_id: String,
    pub is_active: Option<bool>,
}

impl SetIsActiveRequest {
    /// Validate and return the requested flag
    pub fn validate(&self) -> Result<bool, ApiErr> {
        require("user_id", &self.user_id)?;
        self.is_active
            .ok_or_else(|| ApiErr::invalid_input("is_active is required"))
    }
}

/// Body of `POST /pullRequest/create`
#[derive(Debug, Deserialize)]
pub struct CreatePullRequest {
    #[serde(default)]
    pub pull_request_id: String,
    #[serde(default)]
    pub pull_request_name: String,
    #[serde(default)]
    pub author_id: String,
}

impl CreatePullRequest {
    pub fn validate(&self) -> Result<(), ApiErr> {
        require("pull_request_id", &self.pull_request_id)?;
        require("pull_request_name", &self.pull_request_name)?;
        require("author_id", &self.author_id)
    }
}

/// Body of `POST /pullRequest/merge`
#[derive(Debug, Deserialize)]
pub struct MergePullRequest {
    #[serde(default)]
    pub pull_request_id: String,
}

impl MergePullRequest {
    pub fn validate(&self) -> Result<(), ApiErr> {
        require("pull_request_id", &self.pull_request_id)
    }
}

/// Body of `POST /pullRequest/reassign`
#[derive(Debug, Deserialize)]
pub struct ReassignPullRequest {
    #[serde(default)]
    pub pull_request_id: String,
    #[serde(default, alias = "old_user_id")]
    pub old_reviewer_id: String,
}

impl ReassignPullRequest {
    pub fn validate(&self) -> Result<(), ApiErr> {
        require("pull_request_id", &self.pull_request_id)?;
        require("old_reviewer_id", &self.old_reviewer_id)
    }
}

// ── Responses ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TeamMemberView {
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct TeamView {
    pub team_name: String,
    pub members: Vec<TeamMemberView>,
}

impl From<Team> for TeamView {
    fn from(team: Team) -> Self {
        Self {
            team_name: team.team_name,
            members: team
                .members
                .into_iter()
                .map(|m| TeamMemberView {
                    user_id: m.user_id,
                    username: m.username,
                    is_active: m.is_active,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TeamEnvelope {
    pub team: TeamView,
}

#[derive(Debug, Serialize)]
pub struct UserView {
    pub user_id: String,
    pub username: String,
    pub team_name: String,
    pub is_active: bool,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username,
            team_name: user.team_name,
            is_active: user.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserEnvelope {
    pub user: UserView,
}

#[derive(Debug, Serialize)]
pub struct PullRequestView {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PrStatus,
    pub assigned_reviewers: Vec<String>,
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "mergedAt", skip_serializing_if = "Option::is_none")]
    pub merged_at: Option<DateTime<Utc>>,
}

impl From<PullRequest> for PullRequestView {
    fn from(pr: PullRequest) -> Self {
        Self {
            pull_request_id: pr.pr_id,
            pull_request_name: pr.title,
            author_id: pr.author_id,
            status: pr.status,
            assigned_reviewers: pr.reviewers,
            created_at: Some(pr.created_at),
            merged_at: pr.merged_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PullRequestEnvelope {
    pub pr: PullRequestView,
}

#[derive(Debug, Serialize)]
pub struct ReassignResponse {
    pub pr: PullRequestView,
    pub replaced_by: String,
}

#[derive(Debug, Serialize)]
pub struct PullRequestShortView {
    pub pull_request_id: String,
    pub pull_request_name: String,
    pub author_id: String,
    pub status: PrStatus,
}

impl From<PullRequestShort> for PullRequestShortView {
    fn from(pr: PullRequestShort) -> Self {
        Self {
            pull_request_id: pr.pr_id,
            pull_request_name: pr.title,
            author_id: pr.author_id,
            status: pr.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserReviewsResponse {
    pub user_id: String,
    pub pull_requests: Vec<PullRequestShortView>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reassign_accepts_old_user_id_alias() {
        let req: ReassignPullRequest =
            serde_json::from_str(r#"{"pull_request_id":"pr-1","old_user_id":"u2"}"#).unwrap();
        assert_eq!(req.old_reviewer_id, "u2");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_missing_and_blank_fields_are_invalid() {
        let req: CreatePullRequest =
            serde_json::from_str(r#"{"pull_request_id":"pr-1","author_id":"u1"}"#).unwrap();
        let err = req.validate().unwrap_err();
        assert_eq!(err.message, "pull_request_name is required");

        let req: MergePullRequest = serde_json::from_str(r#"{"pull_request_id":"  "}"#).unwrap();
        assert!(req.validate().is_err());

        let req: SetIsActiveRequest = serde_json::from_str(r#"{"user_id":"u1"}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_team_request_requires_members() {
        let req: TeamRequest = serde_json::from_str(r#"{"team_name":"backend"}"#).unwrap();
        assert!(req.validate().is_err());

        let req: TeamRequest = serde_json::from_str(
            r#"{"team_name":"backend","members":[{"user_id":"u1","username":"Alice"}]}"#,
        )
        .unwrap();
        assert_eq!(
            req.validate().unwrap_err().message,
            "members[].is_active is required"
        );
    }

    #[test]
    fn test_pull_request_wire_shape() {
        let created_at = DateTime::parse_from_rfc3339("2025-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        let view = PullRequestView::from(PullRequest {
            pr_id: "pr-1".into(),
            title: "Add search".into(),
            author_id: "u1".into(),
            status: PrStatus::Open,
            reviewers: vec!["u2".into(), "u3".into()],
            created_at,
            merged_at: None,
        });

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["pull_request_id"], "pr-1");
        assert_eq!(json["pull_request_name"], "Add search");
        assert_eq!(json["status"], "OPEN");
        assert_eq!(json["assigned_reviewers"], serde_json::json!(["u2", "u3"]));
        assert_eq!(json["createdAt"], "2025-01-02T03:04:05Z");
        assert!(json.get("mergedAt").is_none());
    }
}
