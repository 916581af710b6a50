//! HTTP exchange types shared by the client, the session and transports.
//!
//! # Design
//! Requests and responses are plain owned data. `ForumClient::build_*`
//! produces an `HttpRequest`, a `Transport` turns it into an `HttpResponse`,
//! and `ForumClient::parse_*` consumes the response. Only GET is needed by
//! the forum API, so the request carries no method.

/// A GET request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }
}

/// An HTTP response described as plain data.
///
/// Non-2xx statuses are represented here as well; deciding what they mean is
/// left to `Session`.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header value named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}
