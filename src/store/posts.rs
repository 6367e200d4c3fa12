//! Database helpers for the post store.
//!
//! Every statement here carries the owner filter; update and delete apply
//! it in the same atomic statement as the write, so a concurrent delete or
//! a foreign owner both surface as "zero rows matched".

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::Instrument;
use utoipa::ToSchema;
use uuid::Uuid;

/// Learning status of a post, transmitted as the literal strings
/// `TO LEARN`, `LEARNING`, `LEARNED`.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    #[serde(rename = "TO LEARN")]
    ToLearn,
    #[serde(rename = "LEARNING")]
    Learning,
    #[serde(rename = "LEARNED")]
    Learned,
}

impl Status {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ToLearn => "TO LEARN",
            Self::Learning => "LEARNING",
            Self::Learned => "LEARNED",
        }
    }
}

impl std::str::FromStr for Status {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "TO LEARN" => Ok(Self::ToLearn),
            "LEARNING" => Ok(Self::Learning),
            "LEARNED" => Ok(Self::Learned),
            other => Err(anyhow!("unknown post status: {other}")),
        }
    }
}

/// A skill being learned, owned by exactly one user.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: Uuid,
    /// Owner's user id; set at creation and immutable.
    pub user: Uuid,
    /// Owner's username, populated on list responses only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub title: String,
    pub description: String,
    pub url: String,
    pub status: Status,
}

/// Caller-supplied fields; the owner never comes from here.
#[derive(Debug, Clone)]
pub struct PostFields {
    pub title: String,
    pub description: String,
    pub url: String,
    pub status: Status,
}

fn row_to_post(row: &PgRow, username: Option<String>) -> Result<Post> {
    let status: String = row.get("status");
    Ok(Post {
        id: row.get("id"),
        user: row.get("owner"),
        username,
        title: row.get("title"),
        description: row.get("description"),
        url: row.get("url"),
        status: status.parse().context("failed to decode post status")?,
    })
}

/// List the caller's posts, newest first, with the owner's username joined in.
pub async fn list_for_owner(pool: &PgPool, owner: Uuid) -> Result<Vec<Post>> {
    let query = "
        SELECT p.id, p.owner, p.title, p.description, p.url, p.status, u.username
        FROM posts p
        JOIN users u ON u.id = p.owner
        WHERE p.owner = $1
        ORDER BY p.created_at DESC
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let rows = sqlx::query(query)
        .bind(owner)
        .fetch_all(pool)
        .instrument(span)
        .await
        .context("failed to list posts")?;

    rows.iter()
        .map(|row| {
            let username: String = row.get("username");
            row_to_post(row, Some(username))
        })
        .collect()
}

/// Insert a post owned by `owner`.
pub async fn create(pool: &PgPool, owner: Uuid, fields: &PostFields) -> Result<Post> {
    let query = "
        INSERT INTO posts (owner, title, description, url, status)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, owner, title, description, url, status
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(owner)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.url)
        .bind(fields.status.as_str())
        .fetch_one(pool)
        .instrument(span)
        .await
        .context("failed to insert post")?;

    row_to_post(&row, None)
}

/// Update a post in one atomic statement scoped by id and owner.
///
/// `None` means zero rows matched: the post does not exist or belongs to
/// someone else, and the two cases are indistinguishable on purpose.
pub async fn update_scoped(
    pool: &PgPool,
    owner: Uuid,
    id: Uuid,
    fields: &PostFields,
) -> Result<Option<Post>> {
    let query = "
        UPDATE posts
        SET title = $3, description = $4, url = $5, status = $6
        WHERE id = $1 AND owner = $2
        RETURNING id, owner, title, description, url, status
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "UPDATE",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(id)
        .bind(owner)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(&fields.url)
        .bind(fields.status.as_str())
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to update post")?;

    row.as_ref().map(|row| row_to_post(row, None)).transpose()
}

/// Delete a post in one atomic statement scoped by id and owner.
///
/// Same zero-rows contract as [`update_scoped`].
pub async fn delete_scoped(pool: &PgPool, owner: Uuid, id: Uuid) -> Result<Option<Post>> {
    let query = "
        DELETE FROM posts
        WHERE id = $1 AND owner = $2
        RETURNING id, owner, title, description, url, status
    ";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "DELETE",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(id)
        .bind(owner)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to delete post")?;

    row.as_ref().map(|row| row_to_post(row, None)).transpose()
}
