//! Domain records: users, teams and pull requests

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Maximum number of reviewers drawn when a pull request is created
pub const MAX_REVIEWERS: usize = 2;

/// A user known to the directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: String,
    pub username: String,
    /// Team the user belongs to
    pub team_name: String,
    /// Only active users are eligible as reviewers
    pub is_active: bool,
}

/// Team membership as submitted to and returned from the directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMember {
    pub user_id: String,
    pub username: String,
    pub is_active: bool,
}

impl From<User> for TeamMember {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username,
            is_active: user.is_active,
        }
    }
}

/// A team and its members
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub team_name: String,
    pub members: Vec<TeamMember>,
}

/// Outcome of a team upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamUpsert {
    pub team: Team,
    /// False when the team already existed and only its members were upserted
    pub created: bool,
}

/// Pull request lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrStatus {
    Open,
    /// Terminal; reviewers and status are frozen
    Merged,
}

impl PrStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrStatus::Open => "OPEN",
            PrStatus::Merged => "MERGED",
        }
    }
}

impl fmt::Display for PrStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "OPEN" => Ok(PrStatus::Open),
            "MERGED" => Ok(PrStatus::Merged),
            other => Err(Error::Consistency(format!("bad status: {}", other))),
        }
    }
}

/// Pull request row without its reviewer set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestHeader {
    pub pr_id: String,
    pub title: String,
    pub author_id: String,
    pub status: PrStatus,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

/// A pull request together with its assigned reviewers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub pr_id: String,
    pub title: String,
    pub author_id: String,
    pub status: PrStatus,
    /// Reviewer user ids in assignment order
    pub reviewers: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub merged_at: Option<DateTime<Utc>>,
}

impl PullRequest {
    /// Attach a reviewer set to a header
    pub fn from_header(header: PullRequestHeader, reviewers: Vec<String>) -> Self {
        Self {
            pr_id: header.pr_id,
            title: header.title,
            author_id: header.author_id,
            status: header.status,
            reviewers,
            created_at: header.created_at,
            merged_at: header.merged_at,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == PrStatus::Open
    }
}

/// Result of a successful reassignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment {
    /// The pull request with its post-swap reviewer set
    pub pull_request: PullRequest,
    /// Id of the reviewer that took over
    pub replaced_by: String,
}

/// Pull request summary used by the per-user review listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestShort {
    pub pr_id: String,
    pub title: String,
    pub author_id: String,
    pub status: PrStatus,
}
