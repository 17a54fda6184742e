use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::state::AppState;
use repository::UnreadTracker;

pub mod handler;
pub mod repository;

pub type Tracker = Arc<dyn UnreadTracker + Send + Sync>;

pub fn api<S>(s: AppState) -> Router<S> {
    Router::new()
        .route("/unread/total", get(handler::total))
        .with_state(s)
}
