use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use serde::Deserialize;

use super::model::ThreadDto;
use super::{Id, service::ThreadService};
use crate::{thread, user};

#[derive(Deserialize)]
pub struct CreateParams {
    counterpart: user::Id,
    context_label: Option<String>,
}

pub async fn create(
    Extension(me): Extension<user::Id>,
    State(thread_service): State<thread::Service>,
    Json(params): Json<CreateParams>,
) -> crate::Result<(StatusCode, Json<ThreadDto>)> {
    let (dto, created) = thread_service
        .get_or_create(&me, &params.counterpart, params.context_label.as_deref())
        .await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(dto)))
}

pub async fn find_all(
    Extension(me): Extension<user::Id>,
    State(thread_service): State<thread::Service>,
) -> crate::Result<Json<Vec<ThreadDto>>> {
    let threads = thread_service.find_all(&me).await?;
    Ok(Json(threads))
}

pub async fn find_one(
    Extension(me): Extension<user::Id>,
    State(thread_service): State<thread::Service>,
    Path(id): Path<Id>,
) -> crate::Result<Json<ThreadDto>> {
    let thread = thread_service.find_by_id_and_member(&id, &me).await?;
    Ok(Json(thread))
}

pub async fn mark_read(
    Extension(me): Extension<user::Id>,
    State(thread_service): State<thread::Service>,
    Path(id): Path<Id>,
) -> crate::Result<StatusCode> {
    thread_service.mark_read(&id, &me).await?;
    Ok(StatusCode::NO_CONTENT)
}
