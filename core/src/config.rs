//! Client configuration.

use serde::{Deserialize, Serialize};

use crate::retry::RetryPolicy;

/// Public host the demo binary talks to.
pub const DEFAULT_HOST: &str = "jsonplaceholder.typicode.com";

/// Everything needed to build a `ForumClient`.
///
/// `host` may carry a scheme and trailing slash; it is normalized when the
/// client is built. `retry` falls back to `RetryPolicy::default()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub host: String,
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST)
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            retry: RetryPolicy::default(),
        }
    }
}
