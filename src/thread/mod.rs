use std::fmt::Display;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::state::AppState;
use crate::user;
use repository::ThreadRepository;
use service::ThreadService;

pub mod handler;
pub mod model;
pub mod repository;
pub mod service;

type Result<T> = std::result::Result<T, Error>;
pub type Repository = Arc<dyn ThreadRepository + Send + Sync>;
pub type Service = Arc<dyn ThreadService + Send + Sync>;

pub fn api<S>(s: AppState) -> Router<S> {
    Router::new()
        .route("/threads", get(handler::find_all))
        .route("/threads", post(handler::create))
        .route("/threads/{id}", get(handler::find_one))
        .route("/threads/{id}/read", put(handler::mark_read))
        .with_state(s)
}

#[derive(Clone, Debug, Deserialize, Serialize, Hash, PartialEq, Eq)]
pub struct Id(Uuid);

impl Id {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub const fn get(&self) -> &Uuid {
        &self.0
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical identifier for an unordered participant pair. Both members
/// derive the same key no matter who opens the conversation, which is
/// what makes it usable as a uniqueness constraint.
#[derive(Clone, Debug, Deserialize, Serialize, Hash, PartialEq, Eq)]
pub struct Key(String);

const KEY_SEPARATOR: char = '_';

impl Key {
    pub fn of(a: &user::Id, b: &user::Id) -> Result<Self> {
        if a.as_str().trim().is_empty() || b.as_str().trim().is_empty() {
            return Err(Error::BlankParticipant);
        }

        if a == b {
            return Err(Error::SameParticipants(a.clone()));
        }

        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

        Ok(Self(format!("{lo}{KEY_SEPARATOR}{hi}")))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("thread not found: {0:?}")]
    NotFound(Option<Id>),
    #[error("thread already exists: {0}")]
    AlreadyExists(Key),
    #[error("user is not a member of the thread")]
    NotMember,
    #[error("a thread requires two distinct participants, got {0} twice")]
    SameParticipants(user::Id),
    #[error("participant id is blank")]
    BlankParticipant,

    #[error(transparent)]
    _User(#[from] user::Error),
}
