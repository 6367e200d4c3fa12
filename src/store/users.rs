//! Database helpers for the credential store.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Row};
use tracing::Instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use super::is_unique_violation;

/// Public view of a user; the password hash never leaves the store.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
}

/// Full credential record, for login verification only.
pub struct Credential {
    pub user_id: Uuid,
    pub password_hash: String,
}

/// Outcome when attempting to create a new user.
#[derive(Debug)]
pub enum CreateOutcome {
    Created(User),
    /// Username already exists. Covers both the pre-insert lookup and a
    /// lost check-then-insert race surfacing as a unique violation.
    Conflict,
}

/// Look up credentials by username (internal login lookup only).
pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<Credential>> {
    let query = "SELECT id, password_hash FROM users WHERE username = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(username)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup user by username")?;

    Ok(row.map(|row| Credential {
        user_id: row.get("id"),
        password_hash: row.get("password_hash"),
    }))
}

/// Fetch a user by id, excluding the password hash.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<User>> {
    let query = "SELECT id, username FROM users WHERE id = $1";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "SELECT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(id)
        .fetch_optional(pool)
        .instrument(span)
        .await
        .context("failed to lookup user by id")?;

    Ok(row.map(|row| User {
        id: row.get("id"),
        username: row.get("username"),
    }))
}

/// Insert a new user with an already-hashed password.
pub async fn create(pool: &PgPool, username: &str, password_hash: &str) -> Result<CreateOutcome> {
    let query = "INSERT INTO users (username, password_hash) VALUES ($1, $2) RETURNING id";
    let span = tracing::info_span!(
        "db.query",
        db.system = "postgresql",
        db.operation = "INSERT",
        db.statement = query
    );
    let row = sqlx::query(query)
        .bind(username)
        .bind(password_hash)
        .fetch_one(pool)
        .instrument(span)
        .await;

    match row {
        Ok(row) => Ok(CreateOutcome::Created(User {
            id: row.get("id"),
            username: username.to_string(),
        })),
        Err(err) if is_unique_violation(&err) => Ok(CreateOutcome::Conflict),
        Err(err) => Err(err).context("failed to insert user"),
    }
}
