//! Blocking client for the forum API.
//!
//! # Design
//! `ForumClient` holds a normalized `base_url` and a `Session`. Every
//! operation is split into a `build_*` method that produces an `HttpRequest`
//! and a `parse_*` method that consumes an `HttpResponse`; the `get_*`
//! methods glue the two together through the session. Builders and parsers
//! touch no network, so they are tested directly.

use tracing::debug;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::retry::RetryPolicy;
use crate::session::Session;
use crate::transport::{Transport, UreqTransport};
use crate::types::{Post, User};
use crate::url::{join_url, normalize_base_url};

/// Synchronous client for `/users` and `/posts`.
///
/// Each call blocks until the exchange, retries included, completes. The
/// client can be shared by reference across threads when its transport
/// allows it; `UreqTransport` does.
#[derive(Debug, Clone)]
pub struct ForumClient<T = UreqTransport> {
    base_url: String,
    session: Session<T>,
}

impl ForumClient<UreqTransport> {
    /// Client for `host` with the default retry policy.
    pub fn new(host: &str) -> Self {
        Self::with_retry(host, RetryPolicy::default())
    }

    /// Client for `host` with a caller-supplied retry policy.
    pub fn with_retry(host: &str, policy: RetryPolicy) -> Self {
        Self {
            base_url: normalize_base_url(host),
            session: Session::with_policy(policy),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_retry(&config.host, config.retry.clone())
    }
}

impl<T: Transport> ForumClient<T> {
    /// Client that uses `base_url` as given apart from trimming trailing
    /// slashes. No scheme is added.
    pub fn with_session(base_url: &str, session: Session<T>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session<T> {
        &self.session
    }

    pub fn build_get_user(&self, user_id: u64) -> HttpRequest {
        HttpRequest::get(join_url(&self.base_url, &format!("users/{user_id}")))
    }

    /// `None` requests every post; `Some(id)` adds a `userId` filter.
    pub fn build_get_posts(&self, user_id: Option<u64>) -> HttpRequest {
        let request = HttpRequest::get(join_url(&self.base_url, "posts"));
        match user_id {
            Some(id) => request.with_query("userId", id),
            None => request,
        }
    }

    pub fn parse_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        User::from_json(&json_body(&response)?)
    }

    /// Posts in the order the server returned them.
    pub fn parse_posts(&self, response: HttpResponse) -> Result<Vec<Post>, ApiError> {
        let value = json_body(&response)?;
        let items = value.as_array().ok_or_else(|| ApiError::Decode {
            what: "post list",
            source: serde::de::Error::custom("expected a JSON array"),
        })?;
        items.iter().map(Post::from_json).collect()
    }

    /// Fetch one user. The returned user has no posts.
    pub fn get_user(&self, user_id: u64) -> Result<User, ApiError> {
        let response = self.session.get(&self.build_get_user(user_id))?;
        self.parse_user(response)
    }

    pub fn get_posts(&self, user_id: Option<u64>) -> Result<Vec<Post>, ApiError> {
        let response = self.session.get(&self.build_get_posts(user_id))?;
        self.parse_posts(response)
    }

    /// Fetch a user and attach posts to it.
    ///
    /// The posts request is sent without a `userId` filter, so the user ends
    /// up holding every post the server returns, not only its own.
    pub fn get_user_posts(&self, user_id: u64) -> Result<User, ApiError> {
        let mut user = self.get_user(user_id)?;
        let posts = self.get_posts(None)?;
        debug!(user_id, posts = posts.len(), "attaching posts");
        user.attach_posts(posts);
        Ok(user)
    }

    /// GET `path` under the base URL with optional query pairs and return
    /// the raw 2xx response.
    pub fn get(&self, path: &str, query: &[(&str, String)]) -> Result<HttpResponse, ApiError> {
        let mut request = HttpRequest::get(join_url(&self.base_url, path));
        for (key, value) in query {
            request = request.with_query(*key, value);
        }
        self.session.get(&request)
    }
}

fn json_body(response: &HttpResponse) -> Result<serde_json::Value, ApiError> {
    serde_json::from_str(&response.body).map_err(ApiError::InvalidJson)
}
