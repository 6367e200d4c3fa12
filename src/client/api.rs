//! Typed HTTP client for the LearnIt API.
//!
//! Holds the access token after login/register and attaches it as a bearer
//! credential to every protected call.

use anyhow::{anyhow, Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::handlers::posts::{
    CreatedResponse, DeletedResponse, PostBody, PostsResponse, UpdatedResponse,
};
use crate::api::handlers::user_identity::UserResponse;
use crate::api::handlers::{Credentials, TokenResponse};
use crate::api::APP_USER_AGENT;
use crate::store::posts::Post;
use crate::store::users::User;

/// Failure envelope shared by every endpoint.
#[derive(Deserialize, Debug)]
struct ErrorBody {
    message: String,
}

pub struct ApiClient {
    base_url: String,
    http: Client,
    token: Option<String>,
}

impl ApiClient {
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .user_agent(APP_USER_AGENT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            token: None,
        })
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Drop the held token, ending the client-side session.
    pub fn logout(&mut self) {
        self.token = None;
    }

    /// Register a new account and keep the returned token.
    ///
    /// # Errors
    /// Returns the server's failure message on rejection.
    pub async fn register(&mut self, username: &str, password: &str) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/api/auth/register", self.base_url))
            .json(&Credentials {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .context("register request failed")?;

        let body: TokenResponse = deserialize_or_fail(response).await?;
        self.token = Some(body.access_token);
        Ok(())
    }

    /// Log in and keep the returned token.
    ///
    /// # Errors
    /// Returns the server's failure message on rejection; wrong password and
    /// unknown username are indistinguishable by design.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/api/auth/login", self.base_url))
            .json(&Credentials {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .context("login request failed")?;

        let body: TokenResponse = deserialize_or_fail(response).await?;
        self.token = Some(body.access_token);
        Ok(())
    }

    /// Resolve the held token back into the account it belongs to.
    ///
    /// # Errors
    /// Returns an error when unauthenticated or the account is gone.
    pub async fn me(&self) -> Result<User> {
        let request = self.authorized(self.http.get(format!("{}/api/auth", self.base_url)))?;
        let response = request.send().await.context("identity request failed")?;

        let body: UserResponse = deserialize_or_fail(response).await?;
        Ok(body.user)
    }

    /// Fetch the caller's posts.
    ///
    /// # Errors
    /// Returns an error when unauthenticated or on transport failure.
    pub async fn posts(&self) -> Result<Vec<Post>> {
        let request = self.authorized(self.http.get(format!("{}/api/posts", self.base_url)))?;
        let response = request.send().await.context("list posts request failed")?;

        let body: PostsResponse = deserialize_or_fail(response).await?;
        Ok(body.posts)
    }

    /// Create a post.
    ///
    /// # Errors
    /// Returns an error when unauthenticated or the title is empty.
    pub async fn add_post(&self, body: &PostBody) -> Result<Post> {
        let request = self.authorized(self.http.post(format!("{}/api/posts", self.base_url)))?;
        let response = request
            .json(body)
            .send()
            .await
            .context("add post request failed")?;

        let body: CreatedResponse = deserialize_or_fail(response).await?;
        Ok(body.new_post)
    }

    /// Update a post owned by the caller.
    ///
    /// # Errors
    /// Returns an error when the post is absent or owned by someone else.
    pub async fn update_post(&self, id: Uuid, body: &PostBody) -> Result<Post> {
        let request =
            self.authorized(self.http.put(format!("{}/api/posts/{id}", self.base_url)))?;
        let response = request
            .json(body)
            .send()
            .await
            .context("update post request failed")?;

        let body: UpdatedResponse = deserialize_or_fail(response).await?;
        Ok(body.updated_post)
    }

    /// Delete a post owned by the caller, returning the deleted record.
    ///
    /// # Errors
    /// Returns an error when the post is absent or owned by someone else.
    pub async fn delete_post(&self, id: Uuid) -> Result<Post> {
        let request =
            self.authorized(self.http.delete(format!("{}/api/posts/{id}", self.base_url)))?;
        let response = request.send().await.context("delete post request failed")?;

        let body: DeletedResponse = deserialize_or_fail(response).await?;
        Ok(body.post)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| anyhow!("not logged in"))?;
        Ok(request.bearer_auth(token))
    }
}

async fn deserialize_or_fail<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        response
            .json::<T>()
            .await
            .context("failed to decode response body")
    } else {
        let message = response
            .json::<ErrorBody>()
            .await
            .map_or_else(|_| status.to_string(), |body| body.message);
        Err(anyhow!(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let client = ApiClient::new("http://localhost:5000/").unwrap();
        assert_eq!(client.base_url, "http://localhost:5000");
    }

    #[test]
    fn protected_calls_require_a_token() {
        let client = ApiClient::new("http://localhost:5000").unwrap();
        let request = client.http.get("http://localhost:5000/api/posts");
        assert!(client.authorized(request).is_err());
    }

    #[test]
    fn logout_drops_the_token() {
        let mut client = ApiClient::new("http://localhost:5000").unwrap();
        client.token = Some("token".to_string());
        client.logout();
        assert!(client.token().is_none());
    }
}
