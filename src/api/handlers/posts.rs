use axum::{
    extract::{rejection::PathRejection, Extension, Path},
    http::HeaderMap,
    response::Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    api::error::ApiError,
    auth::{require_auth, TokenService},
    store::posts::{self, Post, PostFields, Status},
};

// Zero rows matched: absent and foreign-owned are answered identically so
// post ids cannot be probed across accounts.
const NOT_FOUND_OR_NOT_AUTHORISED: &str = "Post not found or user not authorised";

// Success messages, verbatim wire contract including casing.
const CREATED_MESSAGE: &str = "happy learning!";
const UPDATED_MESSAGE: &str = "Excellent progress";
const DELETED_MESSAGE: &str = "deleted post successfully";

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct PostBody {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub status: Status,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct PostsResponse {
    pub success: bool,
    pub posts: Vec<Post>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResponse {
    pub success: bool,
    pub message: String,
    pub new_post: Post,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedResponse {
    pub success: bool,
    pub message: String,
    pub updated_post: Post,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct DeletedResponse {
    pub success: bool,
    pub message: String,
    pub post: Post,
}

/// Guarantee an `https://` scheme prefix on a supplied url.
///
/// A pure string transform, not validation of well-formedness; empty input
/// stays empty since the field is optional.
fn normalize_url(url: &str) -> String {
    if url.is_empty() || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Validate a request body into storable fields. The owner is never part
/// of the body; it always comes from the verified token.
fn validate_body(payload: Option<Json<PostBody>>) -> Result<PostFields, ApiError> {
    let Some(Json(body)) = payload else {
        return Err(ApiError::BadRequest("Title is required".to_string()));
    };

    if body.title.is_empty() {
        return Err(ApiError::BadRequest("Title is required".to_string()));
    }

    Ok(PostFields {
        title: body.title,
        description: body.description,
        url: normalize_url(&body.url),
        status: body.status,
    })
}

fn parse_post_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
    match path {
        Ok(Path(id)) => Ok(id),
        Err(_) => Err(ApiError::BadRequest("Invalid post id".to_string())),
    }
}

#[utoipa::path(
    get,
    path = "/api/posts",
    responses(
        (status = 200, description = "Caller's posts, username populated", body = PostsResponse),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_token" = [])),
    tag = "posts"
)]
#[instrument(skip(headers, pool, tokens))]
pub async fn list(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Extension(tokens): Extension<Arc<TokenService>>,
) -> Result<Json<PostsResponse>, ApiError> {
    let owner = require_auth(&headers, &tokens)?;

    let posts = posts::list_for_owner(&pool, owner).await?;

    Ok(Json(PostsResponse {
        success: true,
        posts,
    }))
}

#[utoipa::path(
    post,
    path = "/api/posts",
    request_body = PostBody,
    responses(
        (status = 200, description = "Post created", body = CreatedResponse),
        (status = 400, description = "Title is required"),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer_token" = [])),
    tag = "posts"
)]
#[instrument(skip(headers, pool, tokens, payload))]
pub async fn create(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Extension(tokens): Extension<Arc<TokenService>>,
    payload: Option<Json<PostBody>>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let owner = require_auth(&headers, &tokens)?;
    let fields = validate_body(payload)?;

    let new_post = posts::create(&pool, owner, &fields).await?;

    Ok(Json(CreatedResponse {
        success: true,
        message: CREATED_MESSAGE.to_string(),
        new_post,
    }))
}

#[utoipa::path(
    put,
    path = "/api/posts/{id}",
    params(("id" = Uuid, Path, description = "Post id")),
    request_body = PostBody,
    responses(
        (status = 200, description = "Post updated", body = UpdatedResponse),
        (status = 400, description = "Title is required"),
        (status = 401, description = "Missing token, invalid token, or post not found / not authorised"),
    ),
    security(("bearer_token" = [])),
    tag = "posts"
)]
#[instrument(skip(headers, pool, tokens, payload))]
pub async fn update(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Extension(tokens): Extension<Arc<TokenService>>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Option<Json<PostBody>>,
) -> Result<Json<UpdatedResponse>, ApiError> {
    let owner = require_auth(&headers, &tokens)?;
    let id = parse_post_id(path)?;
    let fields = validate_body(payload)?;

    let updated_post = posts::update_scoped(&pool, owner, id, &fields)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(NOT_FOUND_OR_NOT_AUTHORISED.to_string()))?;

    Ok(Json(UpdatedResponse {
        success: true,
        message: UPDATED_MESSAGE.to_string(),
        updated_post,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/posts/{id}",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Post deleted", body = DeletedResponse),
        (status = 401, description = "Missing token, invalid token, or post not found / not authorised"),
    ),
    security(("bearer_token" = [])),
    tag = "posts"
)]
#[instrument(skip(headers, pool, tokens))]
pub async fn delete(
    headers: HeaderMap,
    Extension(pool): Extension<PgPool>,
    Extension(tokens): Extension<Arc<TokenService>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let owner = require_auth(&headers, &tokens)?;
    let id = parse_post_id(path)?;

    let post = posts::delete_scoped(&pool, owner, id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized(NOT_FOUND_OR_NOT_AUTHORISED.to_string()))?;

    Ok(Json(DeletedResponse {
        success: true,
        message: DELETED_MESSAGE.to_string(),
        post,
    }))
}
