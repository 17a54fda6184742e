use std::sync::Arc;

use axum::Router;
use axum::routing::post;

use crate::state::AppState;
use crate::{message, thread};
use service::ContactService;

pub mod handler;
pub mod service;

type Result<T> = std::result::Result<T, Error>;
pub type Service = Arc<dyn ContactService + Send + Sync>;

pub fn api<S>(s: AppState) -> Router<S> {
    Router::new()
        .route("/contact", post(handler::contact))
        .with_state(s)
}

#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub enum Error {
    _Thread(#[from] thread::Error),
    _Message(#[from] message::Error),
}
