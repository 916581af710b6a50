//! Forum fixture server used by the client's integration tests.
//!
//! Serves a fixed set of users and posts under `/users/{id}` and `/posts`.
//! Tests can queue failure statuses per path with `ForumState::fail_next`
//! and read how many requests each path received with `ForumState::hits`.

use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use axum::{
    extract::{Path, Query, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    #[serde(rename = "userId")]
    pub user_id: u64,
    pub id: u64,
    pub title: String,
    pub body: String,
}

#[derive(Deserialize)]
pub struct PostsQuery {
    #[serde(rename = "userId")]
    pub user_id: Option<u64>,
}

#[derive(Default)]
struct Faults {
    queued: HashMap<String, VecDeque<u16>>,
    hits: HashMap<String, usize>,
}

/// Shared server state: fixture data plus fault and hit bookkeeping.
///
/// Cheap to clone; every clone sees the same faults and counters, so a test
/// can keep one while the server runs with another.
#[derive(Clone)]
pub struct ForumState {
    users: Arc<Vec<User>>,
    posts: Arc<Vec<Post>>,
    faults: Arc<Mutex<Faults>>,
}

impl Default for ForumState {
    fn default() -> Self {
        Self::new(seed_users(), seed_posts())
    }
}

impl ForumState {
    pub fn new(users: Vec<User>, posts: Vec<Post>) -> Self {
        Self {
            users: Arc::new(users),
            posts: Arc::new(posts),
            faults: Arc::new(Mutex::new(Faults::default())),
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Answer the next `times` requests to `path` with `status`.
    pub fn fail_next(&self, path: &str, status: u16, times: usize) {
        let mut faults = self.lock();
        let queue = faults.queued.entry(path.to_string()).or_default();
        queue.extend(std::iter::repeat(status).take(times));
    }

    /// Requests received for `path`, failed ones included.
    pub fn hits(&self, path: &str) -> usize {
        self.lock().hits.get(path).copied().unwrap_or(0)
    }

    fn record_hit(&self, path: &str) -> Option<u16> {
        let mut faults = self.lock();
        *faults.hits.entry(path.to_string()).or_insert(0) += 1;
        faults.queued.get_mut(path).and_then(VecDeque::pop_front)
    }

    fn lock(&self) -> MutexGuard<'_, Faults> {
        self.faults.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn seed_users() -> Vec<User> {
    vec![
        User {
            id: 1,
            name: "Ada Lovelace".to_string(),
            username: "ada".to_string(),
            email: "ada@forum.test".to_string(),
            phone: "555-0101".to_string(),
        },
        User {
            id: 2,
            name: "Alan Turing".to_string(),
            username: "alan".to_string(),
            email: "alan@forum.test".to_string(),
            phone: "555-0102".to_string(),
        },
    ]
}

pub fn seed_posts() -> Vec<Post> {
    vec![
        Post {
            user_id: 1,
            id: 1,
            title: "Notes on the engine".to_string(),
            body: "The engine weaves algebraic patterns.".to_string(),
        },
        Post {
            user_id: 1,
            id: 2,
            title: "Bernoulli numbers".to_string(),
            body: "A table of operations follows.".to_string(),
        },
        Post {
            user_id: 2,
            id: 3,
            title: "Computable numbers".to_string(),
            body: "On an application to the decision problem.".to_string(),
        },
    ]
}

pub fn app() -> Router {
    app_with_state(ForumState::default())
}

pub fn app_with_state(state: ForumState) -> Router {
    Router::new()
        .route("/users/{id}", get(get_user))
        .route("/posts", get(list_posts))
        .layer(middleware::from_fn_with_state(state.clone(), inject_faults))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with_state(listener, ForumState::default()).await
}

pub async fn run_with_state(listener: TcpListener, state: ForumState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

async fn inject_faults(State(state): State<ForumState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    match state.record_hit(&path) {
        Some(status) => {
            debug!(%path, status, "injecting failure");
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (status, "injected failure").into_response()
        }
        None => next.run(request).await,
    }
}

async fn get_user(State(state): State<ForumState>, Path(id): Path<u64>) -> Result<Json<User>, StatusCode> {
    state
        .users
        .iter()
        .find(|user| user.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn list_posts(State(state): State<ForumState>, Query(query): Query<PostsQuery>) -> Json<Vec<Post>> {
    let posts = state
        .posts
        .iter()
        .filter(|post| query.user_id.map_or(true, |id| post.user_id == id))
        .cloned()
        .collect();
    Json(posts)
}
