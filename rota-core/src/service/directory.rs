//! Team and user queries backing the directory endpoints

use tokio_util::sync::CancellationToken;
use tracing::{info, info_span, Instrument};

use super::ReviewService;
use crate::model::{PullRequestShort, Team, TeamMember, TeamUpsert, User};
use crate::picker::ReviewerPicker;
use crate::store::{ReviewStore, StoreTx};
use crate::{Error, Result};

impl<S: ReviewStore, P: ReviewerPicker> ReviewService<S, P> {
    /// Create a team if needed and upsert its members
    ///
    /// Existing members keep their id; name, team and active flag are
    /// overwritten. Members missing from `team` are left untouched.
    pub async fn upsert_team(&self, team: &Team, cancel: &CancellationToken) -> Result<TeamUpsert> {
        let span = info_span!("upsert_team", team = %team.team_name);
        self.bounded(cancel, async {
            let mut tx = self.store.begin().await?;

            let created = !tx.team_exists(&team.team_name).await?;
            if created {
                tx.insert_team(&team.team_name).await?;
            }

            for member in &team.members {
                let user = User {
                    user_id: member.user_id.clone(),
                    username: member.username.clone(),
                    team_name: team.team_name.clone(),
                    is_active: member.is_active,
                };
                tx.upsert_user(&user).await?;
            }

            let members = tx.list_team_members(&team.team_name).await?;
            tx.commit().await?;

            info!(created, members = members.len(), "team upserted");
            Ok(TeamUpsert {
                team: Team {
                    team_name: team.team_name.clone(),
                    members: members.into_iter().map(TeamMember::from).collect(),
                },
                created,
            })
        })
        .instrument(span)
        .await
    }

    /// Load a team with its members ordered by id
    pub async fn get_team(&self, team_name: &str, cancel: &CancellationToken) -> Result<Team> {
        let span = info_span!("get_team", team = %team_name);
        self.bounded(cancel, async {
            let mut tx = self.store.begin().await?;
            if !tx.team_exists(team_name).await? {
                return Err(Error::TeamNotFound(team_name.to_string()));
            }
            let members = tx.list_team_members(team_name).await?;
            tx.commit().await?;

            Ok(Team {
                team_name: team_name.to_string(),
                members: members.into_iter().map(TeamMember::from).collect(),
            })
        })
        .instrument(span)
        .await
    }

    /// Toggle whether a user is eligible for reviews
    ///
    /// Existing assignments are not touched.
    pub async fn set_user_active(
        &self,
        user_id: &str,
        is_active: bool,
        cancel: &CancellationToken,
    ) -> Result<User> {
        let span = info_span!("set_user_active", user_id = %user_id, is_active);
        self.bounded(cancel, async {
            let mut tx = self.store.begin().await?;
            if tx.set_user_active(user_id, is_active).await? == 0 {
                return Err(Error::UserNotFound(user_id.to_string()));
            }
            let user = tx
                .get_user(user_id)
                .await?
                .ok_or_else(|| Error::Consistency(format!("user {} vanished after update", user_id)))?;
            tx.commit().await?;

            info!("user activity updated");
            Ok(user)
        })
        .instrument(span)
        .await
    }

    /// Pull requests a user is currently reviewing
    pub async fn get_user_reviews(
        &self,
        user_id: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<PullRequestShort>> {
        let span = info_span!("get_user_reviews", user_id = %user_id);
        self.bounded(cancel, async {
            let mut tx = self.store.begin().await?;
            if tx.get_user(user_id).await?.is_none() {
                return Err(Error::UserNotFound(user_id.to_string()));
            }
            let reviews = tx.list_reviews_for_user(user_id).await?;
            tx.commit().await?;
            Ok(reviews)
        })
        .instrument(span)
        .await
    }
}
