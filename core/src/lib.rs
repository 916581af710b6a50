//! Blocking client for a forum-style REST API (users and posts).
//!
//! # Overview
//! `ForumClient` normalizes a host into an `https://` base URL, issues GET
//! requests through a `Session` that retries rate-limit and server-error
//! statuses, and decodes the JSON bodies into `User` and `Post` records.
//!
//! # Design
//! - `build_*` / `parse_*` methods are pure; `get_*` methods do the I/O.
//! - `Session` owns the retry loop; `Transport` performs single exchanges,
//!   so tests can swap the network for a scripted transport.
//! - Errors are never swallowed: every failure reaches the caller as an
//!   `ApiError`.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod retry;
pub mod session;
pub mod transport;
pub mod types;
pub mod url;

pub use client::ForumClient;
pub use config::{ClientConfig, DEFAULT_HOST};
pub use error::ApiError;
pub use http::{HttpRequest, HttpResponse};
pub use retry::RetryPolicy;
pub use session::Session;
pub use transport::{Transport, UreqTransport};
pub use types::{Post, User};
pub use url::normalize_base_url;
