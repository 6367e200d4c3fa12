//! Database-backed tests for ownership scoping and the unique-username
//! constraint.
//!
//! These need a live `PostgreSQL` and are skipped unless `LEARNIT_TEST_DSN`
//! points at one, e.g.
//! `LEARNIT_TEST_DSN=postgres://localhost/learnit_test cargo test`.
//! The schema is applied on connect; rows are created with random usernames
//! so reruns against the same database do not collide.

use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use learnit::store::posts::{self, PostFields, Status};
use learnit::store::users::{self, CreateOutcome};

const SCHEMA_SQL: &str = include_str!("../sql/schema.sql");

async fn test_pool() -> Result<Option<PgPool>> {
    let Ok(dsn) = std::env::var("LEARNIT_TEST_DSN") else {
        eprintln!("Skipping store test: LEARNIT_TEST_DSN is not set");
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&dsn)
        .await
        .context("failed to connect to LEARNIT_TEST_DSN")?;

    for statement in SCHEMA_SQL.split(';') {
        let statement = statement.trim();
        if statement.is_empty() {
            continue;
        }
        sqlx::query(statement)
            .execute(&pool)
            .await
            .context("failed to apply schema statement")?;
    }

    Ok(Some(pool))
}

async fn register_user(pool: &PgPool) -> Result<Uuid> {
    let username = format!("user-{}", Uuid::new_v4());
    match users::create(pool, &username, "fake-hash").await? {
        CreateOutcome::Created(user) => Ok(user.id),
        CreateOutcome::Conflict => anyhow::bail!("random username collided"),
    }
}

fn fields(title: &str, status: Status) -> PostFields {
    PostFields {
        title: title.to_string(),
        description: String::new(),
        url: String::new(),
        status,
    }
}

#[tokio::test]
async fn duplicate_username_reports_conflict() -> Result<()> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };

    let username = format!("user-{}", Uuid::new_v4());
    let first = users::create(&pool, &username, "hash-one").await?;
    assert!(matches!(first, CreateOutcome::Created(_)));

    // Same username again surfaces the unique violation as a conflict, not
    // an error.
    let second = users::create(&pool, &username, "hash-two").await?;
    assert!(matches!(second, CreateOutcome::Conflict));

    Ok(())
}

#[tokio::test]
async fn foreign_owner_cannot_update_or_delete_a_post() -> Result<()> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };

    let owner = register_user(&pool).await?;
    let intruder = register_user(&pool).await?;

    let post = posts::create(&pool, owner, &fields("Learn Rust", Status::ToLearn)).await?;

    // Someone else's token matches zero rows on both mutations.
    let updated =
        posts::update_scoped(&pool, intruder, post.id, &fields("Hijacked", Status::Learned))
            .await?;
    assert!(updated.is_none());

    let deleted = posts::delete_scoped(&pool, intruder, post.id).await?;
    assert!(deleted.is_none());

    // The post is still there, untouched, for its owner.
    let listed = posts::list_for_owner(&pool, owner).await?;
    let survivor = listed
        .iter()
        .find(|candidate| candidate.id == post.id)
        .context("post disappeared after foreign-owner attempts")?;
    assert_eq!(survivor.title, "Learn Rust");
    assert_eq!(survivor.status, Status::ToLearn);

    // Nothing leaked into the intruder's list either.
    let foreign = posts::list_for_owner(&pool, intruder).await?;
    assert!(foreign.iter().all(|candidate| candidate.id != post.id));

    Ok(())
}

#[tokio::test]
async fn owner_update_applies_and_second_delete_matches_nothing() -> Result<()> {
    let Some(pool) = test_pool().await? else {
        return Ok(());
    };

    let owner = register_user(&pool).await?;
    let post = posts::create(&pool, owner, &fields("Learn axum", Status::ToLearn)).await?;

    let updated = posts::update_scoped(&pool, owner, post.id, &fields("Learn axum", Status::Learning))
        .await?
        .context("owner update matched zero rows")?;
    assert_eq!(updated.id, post.id);
    assert_eq!(updated.status, Status::Learning);

    let deleted = posts::delete_scoped(&pool, owner, post.id)
        .await?
        .context("owner delete matched zero rows")?;
    assert_eq!(deleted.id, post.id);

    // The row is gone now, so a repeat delete is indistinguishable from a
    // foreign-owner attempt.
    let repeat = posts::delete_scoped(&pool, owner, post.id).await?;
    assert!(repeat.is_none());

    Ok(())
}
