use std::fmt::Display;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, put};
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use repository::ProfileResolver;

pub mod handler;
pub mod middleware;
pub mod model;
pub mod repository;

type Result<T> = std::result::Result<T, Error>;
pub type Profiles = Arc<dyn ProfileResolver + Send + Sync>;

pub fn api<S>(s: AppState) -> Router<S> {
    Router::new()
        .route("/users/{id}", get(handler::find_one))
        .route("/users/{id}", put(handler::upsert))
        .with_state(s)
}

/// Opaque verified user id, issued by the identity provider upstream.
#[derive(Clone, Debug, Deserialize, Serialize, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Id(String);

impl Id {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("user not found: {0:?}")]
    NotFound(Id),
}
