use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::state::AppState;
use crate::{thread, user};

pub mod handler;
pub mod model;
pub mod service;

pub type Service = Arc<service::EventService>;

pub fn endpoints<S>(s: AppState) -> Router<S> {
    Router::new().route("/ws", get(handler::ws)).with_state(s)
}

/// Routing scope for notifications: a member's thread-list feed or one
/// thread's message feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Subject {
    Notifications(user::Id),
    Messages(thread::Id),
}
