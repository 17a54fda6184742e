use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use super::model::Profile;
use super::repository::ProfileResolver;
use crate::user;

pub async fn find_one(
    State(profiles): State<user::Profiles>,
    Path(id): Path<user::Id>,
) -> crate::Result<Json<Profile>> {
    let profile = profiles
        .get_profile(&id)
        .await?
        .ok_or(user::Error::NotFound(id))?;

    Ok(Json(profile))
}

pub async fn upsert(
    State(profiles): State<user::Profiles>,
    Path(id): Path<user::Id>,
    Json(profile): Json<Profile>,
) -> crate::Result<StatusCode> {
    profiles.upsert(&id, profile).await?;
    Ok(StatusCode::NO_CONTENT)
}
