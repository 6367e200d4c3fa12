use axum::{extract::Extension, response::Json};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::instrument;

use crate::{
    api::{
        error::ApiError,
        handlers::{Credentials, TokenResponse},
    },
    auth::{password, TokenService},
    store::users::{self, CreateOutcome},
};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = Credentials,
    responses(
        (status = 200, description = "User created, access token returned", body = TokenResponse),
        (status = 400, description = "Missing user and/or password"),
        (status = 409, description = "Username already taken"),
    ),
    tag = "auth"
)]
#[instrument(skip(pool, tokens, payload))]
pub async fn register(
    Extension(pool): Extension<PgPool>,
    Extension(tokens): Extension<Arc<TokenService>>,
    payload: Option<Json<Credentials>>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Some(Json(credentials)) = payload else {
        return Err(ApiError::BadRequest(
            "Missing user and/or password".to_string(),
        ));
    };

    if credentials.username.is_empty() || credentials.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Missing user and/or password".to_string(),
        ));
    }

    // check for existing user
    if users::find_by_username(&pool, &credentials.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Username already taken".to_string()));
    }

    let hashed_password = password::hash(&credentials.password)?;

    // A concurrent register for the same username can still win the insert;
    // the unique index turns that race into the same conflict.
    let user = match users::create(&pool, &credentials.username, &hashed_password).await? {
        CreateOutcome::Created(user) => user,
        CreateOutcome::Conflict => {
            return Err(ApiError::Conflict("Username already taken".to_string()));
        }
    };

    let access_token = tokens.issue(user.id)?;

    Ok(Json(TokenResponse {
        success: true,
        message: "User created successfully".to_string(),
        access_token,
    }))
}
