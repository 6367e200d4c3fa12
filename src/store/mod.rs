//! Identity-scoped persistence over `PostgreSQL`.
//!
//! Mutations of owned rows are single atomic statements filtered by both
//! row id and owner, so there is no check-then-act window between an
//! ownership check and the write.

pub mod posts;
pub mod users;

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}
