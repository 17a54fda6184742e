use axum::extract::State;
use axum::{Extension, Json};

use super::repository::UnreadTracker;
use crate::{unread, user};

pub async fn total(
    Extension(me): Extension<user::Id>,
    State(tracker): State<unread::Tracker>,
) -> Json<u64> {
    Json(tracker.total_for(&me).await)
}
