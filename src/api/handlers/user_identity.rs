use axum::{extract::Extension, http::HeaderMap, response::Json};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

use crate::{
    api::error::ApiError,
    auth::{require_auth, TokenService},
    store::users::{self, User},
};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct UserResponse {
    pub success: bool,
    pub user: User,
}

// Who am I: resolve the caller's token back into their user record.
#[utoipa::path(
    get,
    path = "/api/auth",
    responses(
        (status = 200, description = "Authenticated user, password excluded", body = UserResponse),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "User no longer exists"),
    ),
    security(("bearer_token" = [])),
    tag = "auth"
)]
#[instrument(skip(headers, pool, tokens))]
pub async fn identity(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Extension(tokens): Extension<Arc<TokenService>>,
) -> Result<Json<UserResponse>, ApiError> {
    let user_id = require_auth(&headers, &tokens)?;

    // The signature is trusted but the account may have been removed
    // out-of-band since the token was issued.
    let user = users::find_by_id(&pool, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(UserResponse {
        success: true,
        user,
    }))
}
