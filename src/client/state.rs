//! Pure state-transition table for the client's post list.
//!
//! A closed set of events over an explicit state shape; no UI framework,
//! no IO. The [`reduce`] function is the single place client-side post
//! state can change, which makes every transition testable in isolation.

use crate::store::posts::Post;
use uuid::Uuid;

/// Client-held mirror of the server's post list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostsState {
    pub posts: Vec<Post>,
    /// Post currently picked for editing, if any.
    pub selected: Option<Post>,
    /// True until the first load resolves either way.
    pub loading: bool,
}

impl Default for PostsState {
    fn default() -> Self {
        Self {
            posts: Vec::new(),
            selected: None,
            loading: true,
        }
    }
}

/// Everything that can happen to [`PostsState`].
#[derive(Debug, Clone)]
pub enum PostsEvent {
    Loaded(Vec<Post>),
    LoadFailed,
    Added(Post),
    Deleted(Uuid),
    Updated(Post),
    Selected(Option<Post>),
}

/// Apply one event to the state, returning the next state.
#[must_use]
pub fn reduce(state: PostsState, event: PostsEvent) -> PostsState {
    let PostsState {
        mut posts,
        selected,
        loading,
    } = state;

    match event {
        PostsEvent::Loaded(posts) => PostsState {
            posts,
            selected,
            loading: false,
        },
        PostsEvent::LoadFailed => PostsState {
            posts: Vec::new(),
            selected,
            loading: false,
        },
        PostsEvent::Added(post) => {
            posts.push(post);
            PostsState {
                posts,
                selected,
                loading,
            }
        }
        PostsEvent::Deleted(id) => PostsState {
            posts: posts.into_iter().filter(|post| post.id != id).collect(),
            selected,
            loading,
        },
        PostsEvent::Updated(updated) => PostsState {
            posts: posts
                .into_iter()
                .map(|post| {
                    if post.id == updated.id {
                        updated.clone()
                    } else {
                        post
                    }
                })
                .collect(),
            selected,
            loading,
        },
        PostsEvent::Selected(post) => PostsState {
            posts,
            selected: post,
            loading,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::posts::Status;

    fn post(title: &str) -> Post {
        Post {
            id: Uuid::new_v4(),
            user: Uuid::new_v4(),
            username: None,
            title: title.to_string(),
            description: String::new(),
            url: String::new(),
            status: Status::default(),
        }
    }

    #[test]
    fn initial_state_is_loading_and_empty() {
        let state = PostsState::default();
        assert!(state.loading);
        assert!(state.posts.is_empty());
        assert!(state.selected.is_none());
    }

    #[test]
    fn loaded_replaces_posts_and_clears_loading() {
        let posts = vec![post("Rust"), post("SQL")];
        let state = reduce(PostsState::default(), PostsEvent::Loaded(posts.clone()));

        assert!(!state.loading);
        assert_eq!(state.posts, posts);
    }

    #[test]
    fn load_failed_clears_posts_and_loading() {
        let loaded = reduce(
            PostsState::default(),
            PostsEvent::Loaded(vec![post("Rust")]),
        );
        let state = reduce(loaded, PostsEvent::LoadFailed);

        assert!(!state.loading);
        assert!(state.posts.is_empty());
    }

    #[test]
    fn added_appends() {
        let first = post("Rust");
        let second = post("SQL");
        let state = reduce(
            PostsState::default(),
            PostsEvent::Loaded(vec![first.clone()]),
        );
        let state = reduce(state, PostsEvent::Added(second.clone()));

        assert_eq!(state.posts, vec![first, second]);
    }

    #[test]
    fn deleted_removes_only_the_matching_post() {
        let first = post("Rust");
        let second = post("SQL");
        let state = reduce(
            PostsState::default(),
            PostsEvent::Loaded(vec![first.clone(), second.clone()]),
        );
        let state = reduce(state, PostsEvent::Deleted(first.id));

        assert_eq!(state.posts, vec![second]);
    }

    #[test]
    fn deleting_an_unknown_id_changes_nothing() {
        let first = post("Rust");
        let state = reduce(
            PostsState::default(),
            PostsEvent::Loaded(vec![first.clone()]),
        );
        let state = reduce(state, PostsEvent::Deleted(Uuid::new_v4()));

        assert_eq!(state.posts, vec![first]);
    }

    #[test]
    fn updated_replaces_in_place() {
        let first = post("Rust");
        let second = post("SQL");
        let mut renamed = second.clone();
        renamed.title = "PostgreSQL".to_string();
        renamed.status = Status::Learning;

        let state = reduce(
            PostsState::default(),
            PostsEvent::Loaded(vec![first.clone(), second]),
        );
        let state = reduce(state, PostsEvent::Updated(renamed.clone()));

        assert_eq!(state.posts, vec![first, renamed]);
    }

    #[test]
    fn selected_sets_and_clears() {
        let chosen = post("Rust");
        let state = reduce(
            PostsState::default(),
            PostsEvent::Selected(Some(chosen.clone())),
        );
        assert_eq!(state.selected, Some(chosen));

        let state = reduce(state, PostsEvent::Selected(None));
        assert_eq!(state.selected, None);
    }
}
