//! Client-side session: the API client plus the post-list state machine.
//!
//! [`Session`] mirrors the reference frontend's context: every server call
//! resolves into a [`state::PostsEvent`] applied through the pure reducer,
//! so the held state only ever changes via the transition table.

pub mod api;
pub mod state;

pub use self::api::ApiClient;
pub use self::state::{reduce, PostsEvent, PostsState};

use anyhow::Result;
use uuid::Uuid;

use crate::api::handlers::posts::PostBody;

pub struct Session {
    api: ApiClient,
    state: PostsState,
}

impl Session {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(base_url)?,
            state: PostsState::default(),
        })
    }

    #[must_use]
    pub fn state(&self) -> &PostsState {
        &self.state
    }

    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// # Errors
    /// Propagates the server's rejection message.
    pub async fn register(&mut self, username: &str, password: &str) -> Result<()> {
        self.api.register(username, password).await
    }

    /// # Errors
    /// Propagates the server's rejection message.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        self.api.login(username, password).await
    }

    /// Refresh the post list; a failed load empties it rather than keeping
    /// stale entries around.
    pub async fn load_posts(&mut self) {
        let event = match self.api.posts().await {
            Ok(posts) => PostsEvent::Loaded(posts),
            Err(_) => PostsEvent::LoadFailed,
        };
        self.dispatch(event);
    }

    /// # Errors
    /// Propagates the server's rejection; the state is untouched on failure.
    pub async fn add_post(&mut self, body: &PostBody) -> Result<()> {
        let post = self.api.add_post(body).await?;
        self.dispatch(PostsEvent::Added(post));
        Ok(())
    }

    /// # Errors
    /// Propagates the server's rejection; the state is untouched on failure.
    pub async fn update_post(&mut self, id: Uuid, body: &PostBody) -> Result<()> {
        let post = self.api.update_post(id, body).await?;
        self.dispatch(PostsEvent::Updated(post));
        Ok(())
    }

    /// # Errors
    /// Propagates the server's rejection; the state is untouched on failure.
    pub async fn delete_post(&mut self, id: Uuid) -> Result<()> {
        self.api.delete_post(id).await?;
        self.dispatch(PostsEvent::Deleted(id));
        Ok(())
    }

    /// Pick a post from the held list for editing, or clear the selection.
    pub fn select_post(&mut self, id: Option<Uuid>) {
        let selected =
            id.and_then(|id| self.state.posts.iter().find(|post| post.id == id).cloned());
        self.dispatch(PostsEvent::Selected(selected));
    }

    fn dispatch(&mut self, event: PostsEvent) {
        self.state = reduce(std::mem::take(&mut self.state), event);
    }
}
