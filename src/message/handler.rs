use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use axum_extra::extract::Query;
use serde::Deserialize;

use super::model::Message;
use super::service::MessageService;
use crate::error::Error;
use crate::{message, thread, user};

#[derive(Deserialize)]
pub struct CreateParams {
    thread_id: thread::Id,
    text: String,
}

pub async fn create(
    Extension(me): Extension<user::Id>,
    State(message_service): State<message::Service>,
    Json(params): Json<CreateParams>,
) -> crate::Result<(StatusCode, Json<Message>)> {
    let msg = message_service
        .create(&me, &params.thread_id, &params.text)
        .await?;

    Ok((StatusCode::CREATED, Json(msg)))
}

#[derive(Deserialize)]
pub struct FindAllParams {
    thread_id: Option<thread::Id>,
    limit: Option<usize>,
    before: Option<i64>,
}

pub async fn find_all(
    Extension(me): Extension<user::Id>,
    State(message_service): State<message::Service>,
    Query(params): Query<FindAllParams>,
) -> crate::Result<Json<Vec<Message>>> {
    let thread_id = params
        .thread_id
        .ok_or(Error::QueryParamRequired("thread_id".to_owned()))?;

    let messages = message_service
        .find_by_thread_id_and_params(&me, &thread_id, params.limit, params.before)
        .await?;

    Ok(Json(messages))
}
