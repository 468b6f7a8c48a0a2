//! SQLite implementation of the review store
//!
//! Every transaction starts with `BEGIN IMMEDIATE`, taking SQLite's write
//! lock up front. Two engine operations therefore never interleave their
//! read-decide-write sequences: the second one waits (bounded by the busy
//! timeout) and then reads what the first one committed.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rota_core::model::{PullRequestHeader, PullRequestShort, User};
use rota_core::store::{ReviewStore, StoreTx};
use rota_core::{Error, Result};
use sqlx::{Sqlite, SqlitePool, Transaction};

/// Review store backed by a SQLite pool
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new store over an already migrated pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl ReviewStore for SqliteStore {
    type Tx = SqliteTx;

    async fn begin(&self) -> Result<SqliteTx> {
        let tx = self
            .pool
            .begin_with("BEGIN IMMEDIATE")
            .await
            .map_err(Error::storage)?;
        Ok(SqliteTx { tx })
    }
}

/// One `BEGIN IMMEDIATE` transaction; rolls back when dropped uncommitted
pub struct SqliteTx {
    tx: Transaction<'static, Sqlite>,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    name: String,
    team_name: String,
    is_active: bool,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: row.id,
            username: row.name,
            team_name: row.team_name,
            is_active: row.is_active,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PullRequestRow {
    id: String,
    title: String,
    author_id: String,
    status: String,
    created_at: DateTime<Utc>,
    merged_at: Option<DateTime<Utc>>,
}

impl TryFrom<PullRequestRow> for PullRequestHeader {
    type Error = Error;

    fn try_from(row: PullRequestRow) -> Result<Self> {
        Ok(Self {
            pr_id: row.id,
            title: row.title,
            author_id: row.author_id,
            status: row.status.parse()?,
            created_at: row.created_at,
            merged_at: row.merged_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct PullRequestShortRow {
    id: String,
    title: String,
    author_id: String,
    status: String,
}

impl TryFrom<PullRequestShortRow> for PullRequestShort {
    type Error = Error;

    fn try_from(row: PullRequestShortRow) -> Result<Self> {
        Ok(Self {
            pr_id: row.id,
            title: row.title,
            author_id: row.author_id,
            status: row.status.parse()?,
        })
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

#[async_trait]
impl StoreTx for SqliteTx {
    async fn get_user(&mut self, user_id: &str) -> Result<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, team_name, is_active FROM users WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(Error::storage)?;

        Ok(row.map(User::from))
    }

    async fn list_team_members(&mut self, team_name: &str) -> Result<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, team_name, is_active FROM users WHERE team_name = ? ORDER BY id",
        )
        .bind(team_name)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(Error::storage)?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn team_exists(&mut self, team_name: &str) -> Result<bool> {
        let row: Option<(String,)> = sqlx::query_as("SELECT name FROM teams WHERE name = ?")
            .bind(team_name)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(Error::storage)?;

        Ok(row.is_some())
    }

    async fn insert_team(&mut self, team_name: &str) -> Result<()> {
        sqlx::query("INSERT INTO teams (name) VALUES (?)")
            .bind(team_name)
            .execute(&mut *self.tx)
            .await
            .map_err(Error::storage)?;

        Ok(())
    }

    async fn upsert_user(&mut self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, team_name, is_active)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                team_name = excluded.team_name,
                is_active = excluded.is_active
            "#,
        )
        .bind(&user.user_id)
        .bind(&user.username)
        .bind(&user.team_name)
        .bind(user.is_active)
        .execute(&mut *self.tx)
        .await
        .map_err(Error::storage)?;

        Ok(())
    }

    async fn set_user_active(&mut self, user_id: &str, is_active: bool) -> Result<u64> {
        let result = sqlx::query("UPDATE users SET is_active = ? WHERE id = ?")
            .bind(is_active)
            .bind(user_id)
            .execute(&mut *self.tx)
            .await
            .map_err(Error::storage)?;

        Ok(result.rows_affected())
    }

    async fn get_pull_request_header(
        &mut self,
        pr_id: &str,
    ) -> Result<Option<PullRequestHeader>> {
        let row = sqlx::query_as::<_, PullRequestRow>(
            r#"
            SELECT id, title, author_id, status, created_at, merged_at
            FROM pull_requests
            WHERE id = ?
            "#,
        )
        .bind(pr_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(Error::storage)?;

        row.map(PullRequestHeader::try_from).transpose()
    }

    async fn get_reviewers(&mut self, pr_id: &str) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT user_id FROM pull_request_reviewers WHERE pr_id = ? ORDER BY rowid",
        )
        .bind(pr_id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(Error::storage)?;

        Ok(rows.into_iter().map(|(user_id,)| user_id).collect())
    }

    async fn insert_pull_request_with_reviewers(
        &mut self,
        header: &PullRequestHeader,
        reviewers: &[String],
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO pull_requests (id, title, author_id, status, created_at, merged_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&header.pr_id)
        .bind(&header.title)
        .bind(&header.author_id)
        .bind(header.status.as_str())
        .bind(header.created_at)
        .bind(header.merged_at)
        .execute(&mut *self.tx)
        .await
        .map_err(|err| {
            if is_unique_violation(&err) {
                Error::PrAlreadyExists(header.pr_id.clone())
            } else {
                Error::storage(err)
            }
        })?;

        for user_id in reviewers {
            sqlx::query("INSERT INTO pull_request_reviewers (pr_id, user_id) VALUES (?, ?)")
                .bind(&header.pr_id)
                .bind(user_id)
                .execute(&mut *self.tx)
                .await
                .map_err(Error::storage)?;
        }

        Ok(())
    }

    async fn insert_reviewer(&mut self, pr_id: &str, user_id: &str) -> Result<u64> {
        let result = sqlx::query(
            "INSERT INTO pull_request_reviewers (pr_id, user_id) VALUES (?, ?) ON CONFLICT DO NOTHING",
        )
        .bind(pr_id)
        .bind(user_id)
        .execute(&mut *self.tx)
        .await
        .map_err(Error::storage)?;

        Ok(result.rows_affected())
    }

    async fn delete_reviewer(&mut self, pr_id: &str, user_id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM pull_request_reviewers WHERE pr_id = ? AND user_id = ?")
            .bind(pr_id)
            .bind(user_id)
            .execute(&mut *self.tx)
            .await
            .map_err(Error::storage)?;

        Ok(result.rows_affected())
    }

    async fn set_merged(&mut self, pr_id: &str, merged_at: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE pull_requests SET status = 'MERGED', merged_at = ? WHERE id = ? AND status = 'OPEN'",
        )
        .bind(merged_at)
        .bind(pr_id)
        .execute(&mut *self.tx)
        .await
        .map_err(Error::storage)?;

        Ok(result.rows_affected())
    }

    async fn list_reviews_for_user(&mut self, user_id: &str) -> Result<Vec<PullRequestShort>> {
        let rows = sqlx::query_as::<_, PullRequestShortRow>(
            r#"
            SELECT pr.id, pr.title, pr.author_id, pr.status
            FROM pull_requests pr
            JOIN pull_request_reviewers r ON r.pr_id = pr.id
            WHERE r.user_id = ?
            ORDER BY pr.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(Error::storage)?;

        rows.into_iter().map(PullRequestShort::try_from).collect()
    }

    async fn commit(self) -> Result<()> {
        self.tx.commit().await.map_err(Error::storage)
    }
}
