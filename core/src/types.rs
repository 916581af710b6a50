//! Forum records decoded from API payloads.
//!
//! # Design
//! Field names follow Rust conventions; serde renames map them to the wire
//! names (`userId`). A `User` is decoded without posts and gains them in a
//! separate step through `attach_posts`, which is how `get_user_posts`
//! composes the two endpoints.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// A single post returned by `/posts`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub id: u64,
    #[serde(rename = "userId")]
    pub user_id: u64,
    pub title: String,
    pub body: String,
}

impl Post {
    /// Decode a post from a JSON object with keys `id`, `userId`, `title`, `body`.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ApiError> {
        Self::deserialize(value).map_err(|source| ApiError::Decode {
            what: "post",
            source,
        })
    }
}

/// A user returned by `/users/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Never read from the payload; filled by `attach_posts`.
    #[serde(skip_deserializing)]
    pub posts: Vec<Post>,
}

impl User {
    /// Decode a user from a JSON object with keys `id`, `name`, `email`,
    /// `phone`. The post list always starts empty.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ApiError> {
        Self::deserialize(value).map_err(|source| ApiError::Decode {
            what: "user",
            source,
        })
    }

    /// Append `posts` in order. Ownership is not checked: posts whose
    /// `user_id` differs from `self.id` are attached as well.
    pub fn attach_posts(&mut self, posts: impl IntoIterator<Item = Post>) {
        self.posts.extend(posts);
    }
}
