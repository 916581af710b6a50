//! HTTP session: one transport plus the retry policy applied to it.
//!
//! # Design
//! `Session::get` is the only place that interprets status codes. A
//! retryable status is retried until the policy runs out of attempts; any
//! other non-2xx status, and any transport failure, is returned on the spot.
//! Each call is independent: no state survives between calls except what
//! the transport keeps (its connection pool).

use std::thread;

use tracing::{debug, warn};

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::retry::RetryPolicy;
use crate::transport::{Transport, UreqTransport};

#[derive(Debug, Clone)]
pub struct Session<T = UreqTransport> {
    transport: T,
    policy: RetryPolicy,
}

impl Default for Session<UreqTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl Session<UreqTransport> {
    pub fn new() -> Self {
        Self::with_policy(RetryPolicy::default())
    }

    pub fn with_policy(policy: RetryPolicy) -> Self {
        Self::with_transport(UreqTransport::new(), policy)
    }
}

impl<T: Transport> Session<T> {
    pub fn with_transport(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute `request`, retrying retryable statuses, and return the first
    /// 2xx response.
    pub fn get(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut attempt = 1;
        loop {
            debug!(url = %request.url, attempt, "sending request");
            let response = self.transport.execute(request)?;
            if response.is_success() {
                return Ok(response);
            }

            if !self.policy.is_retryable(response.status) {
                return Err(ApiError::Status {
                    url: request.url.clone(),
                    status: response.status,
                    body: response.body,
                });
            }
            if !self.policy.should_retry(response.status, attempt) {
                return Err(ApiError::RetriesExhausted {
                    url: request.url.clone(),
                    status: response.status,
                    attempts: attempt,
                });
            }

            let delay = self.policy.delay_for(&response, attempt);
            warn!(
                url = %request.url,
                status = response.status,
                attempt,
                ?delay,
                "retrying request"
            );
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            attempt += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::time::{Duration, Instant};

    use super::*;

    /// Replays canned statuses in order and records every request it sees.
    struct Scripted {
        statuses: RefCell<VecDeque<u16>>,
        headers: Vec<(String, String)>,
        seen: RefCell<Vec<HttpRequest>>,
    }

    impl Scripted {
        fn new(statuses: &[u16]) -> Self {
            Self {
                statuses: RefCell::new(statuses.iter().copied().collect()),
                headers: Vec::new(),
                seen: RefCell::new(Vec::new()),
            }
        }

        /// Every scripted response carries `Retry-After: <secs>`.
        fn with_retry_after(mut self, secs: &str) -> Self {
            self.headers.push(("Retry-After".to_string(), secs.to_string()));
            self
        }

        fn calls(&self) -> usize {
            self.seen.borrow().len()
        }
    }

    impl Transport for Scripted {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            self.seen.borrow_mut().push(request.clone());
            let status = self.statuses.borrow_mut().pop_front().expect("script exhausted");
            Ok(HttpResponse {
                status,
                headers: self.headers.clone(),
                body: format!("status {status}"),
            })
        }
    }

    fn session(statuses: &[u16]) -> Session<Scripted> {
        Session::with_transport(Scripted::new(statuses), RetryPolicy::default())
    }

    fn request() -> HttpRequest {
        HttpRequest::get("https://forum.test/posts")
    }

    #[test]
    fn success_is_returned_after_one_call() {
        let session = session(&[200]);
        let response = session.get(&request()).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(session.transport().calls(), 1);
    }

    #[test]
    fn three_unavailable_then_ok_succeeds_on_fourth_attempt() {
        let session = session(&[503, 503, 503, 200]);
        let response = session.get(&request()).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(session.transport().calls(), 4);
    }

    #[test]
    fn four_unavailable_then_ok_succeeds_on_fifth_attempt() {
        let session = session(&[503, 503, 503, 503, 200]);
        let response = session.get(&request()).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(session.transport().calls(), 5);
    }

    #[test]
    fn five_unavailable_exhausts_retries() {
        let session = session(&[503, 503, 503, 503, 503, 200]);
        let err = session.get(&request()).unwrap_err();
        assert!(
            matches!(err, ApiError::RetriesExhausted { status: 503, attempts: 5, .. }),
            "{err:?}"
        );
        assert_eq!(session.transport().calls(), 5);
    }

    #[test]
    fn no_retry_policy_sends_one_request() {
        let session = Session::with_transport(Scripted::new(&[503, 200]), RetryPolicy::none());
        let err = session.get(&request()).unwrap_err();
        assert!(matches!(err, ApiError::RetriesExhausted { attempts: 1, .. }));
        assert_eq!(session.transport().calls(), 1);
    }

    #[test]
    fn backoff_waits_between_consecutive_retries() {
        let policy = RetryPolicy {
            backoff_factor: 0.01,
            ..RetryPolicy::default()
        };
        let session = Session::with_transport(Scripted::new(&[500, 500, 200]), policy);

        let started = Instant::now();
        session.get(&request()).unwrap();
        // First retry is immediate, the second waits 0.01 * 2 seconds.
        assert!(started.elapsed() >= Duration::from_millis(20), "{:?}", started.elapsed());
        assert_eq!(session.transport().calls(), 3);
    }

    #[test]
    fn retry_after_header_delays_the_next_attempt() {
        let policy = RetryPolicy {
            max_backoff: Duration::from_millis(30),
            ..RetryPolicy::default()
        };
        let transport = Scripted::new(&[429, 200]).with_retry_after("5");
        let session = Session::with_transport(transport, policy);

        let started = Instant::now();
        session.get(&request()).unwrap();
        // Five seconds requested, capped to max_backoff.
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(30), "{elapsed:?}");
        assert!(elapsed < Duration::from_secs(5), "{elapsed:?}");
        assert_eq!(session.transport().calls(), 2);
    }

    #[test]
    fn not_found_fails_without_retry() {
        let session = session(&[404, 200]);
        let err = session.get(&request()).unwrap_err();
        match err {
            ApiError::Status { status, body, url } => {
                assert_eq!(status, 404);
                assert_eq!(body, "status 404");
                assert_eq!(url, "https://forum.test/posts");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(session.transport().calls(), 1);
    }

    #[test]
    fn mixed_retryable_statuses_share_one_budget() {
        let session = session(&[429, 500, 502, 504, 200]);
        assert!(session.get(&request()).is_ok());
        assert_eq!(session.transport().calls(), 5);
    }

    #[test]
    fn retryable_then_fatal_stops_immediately() {
        let session = session(&[503, 400, 200]);
        let err = session.get(&request()).unwrap_err();
        assert_eq!(err.status(), Some(400));
        assert_eq!(session.transport().calls(), 2);
    }

    #[test]
    fn custom_policy_narrows_retryable_set() {
        let policy = RetryPolicy {
            max_attempts: 2,
            retryable_status_codes: vec![500],
            ..RetryPolicy::default()
        };
        let session = Session::with_transport(Scripted::new(&[503, 200]), policy);
        let err = session.get(&request()).unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 503, .. }));

        let policy = RetryPolicy {
            max_attempts: 1,
            retryable_status_codes: vec![500],
            ..RetryPolicy::default()
        };
        let session = Session::with_transport(Scripted::new(&[500, 500, 200]), policy);
        let err = session.get(&request()).unwrap_err();
        assert!(matches!(err, ApiError::RetriesExhausted { attempts: 2, .. }));
        assert_eq!(session.transport().calls(), 2);
    }

    #[test]
    fn every_attempt_reissues_the_same_request() {
        let session = session(&[502, 200]);
        let req = request().with_query("userId", 1);
        session.get(&req).unwrap();
        let seen = session.transport().seen.borrow();
        assert_eq!(seen.len(), 2);
        assert!(seen.iter().all(|r| *r == req));
    }
}
