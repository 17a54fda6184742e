use axum::extract::State;
use axum::{Extension, Json};
use serde::Deserialize;

use super::service::ContactService;
use crate::thread::model::ThreadDto;
use crate::{contact, user};

#[derive(Deserialize)]
pub struct ContactParams {
    counterpart: Option<user::Id>,
    context_label: Option<String>,
}

pub async fn contact(
    Extension(me): Extension<user::Id>,
    State(contact_service): State<contact::Service>,
    Json(params): Json<ContactParams>,
) -> crate::Result<Json<ThreadDto>> {
    let dto = contact_service
        .contact(
            &me,
            params.counterpart.as_ref(),
            params.context_label.as_deref(),
        )
        .await?;

    Ok(Json(dto))
}
