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
    store::users,
};

// Unknown username and wrong password answer identically so the endpoint
// cannot be used to enumerate accounts.
const BAD_CREDENTIALS: &str = "Incorrect username or password";

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = Credentials,
    responses(
        (status = 200, description = "Logged in, access token returned", body = TokenResponse),
        (status = 400, description = "Missing username or password"),
        (status = 401, description = "Incorrect username or password"),
    ),
    tag = "auth"
)]
#[instrument(skip(pool, tokens, payload))]
pub async fn login(
    Extension(pool): Extension<PgPool>,
    Extension(tokens): Extension<Arc<TokenService>>,
    payload: Option<Json<Credentials>>,
) -> Result<Json<TokenResponse>, ApiError> {
    let Some(Json(credentials)) = payload else {
        return Err(ApiError::BadRequest(
            "Missing username or password".to_string(),
        ));
    };

    if credentials.username.is_empty() || credentials.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Missing username or password".to_string(),
        ));
    }

    let Some(credential) = users::find_by_username(&pool, &credentials.username).await? else {
        return Err(ApiError::Unauthorized(BAD_CREDENTIALS.to_string()));
    };

    if !password::verify(&credential.password_hash, &credentials.password) {
        return Err(ApiError::Unauthorized(BAD_CREDENTIALS.to_string()));
    }

    let access_token = tokens.issue(credential.user_id)?;

    Ok(Json(TokenResponse {
        success: true,
        message: "User logged in successfully".to_string(),
        access_token,
    }))
}
