use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::Error;
use crate::user;

/// Header set by the gateway after it has verified the caller.
pub const USER_ID_HEADER: &str = "x-user-id";

pub async fn authenticate(mut req: Request, next: Next) -> crate::Result<Response> {
    let id = req
        .headers()
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(user::Id::from)
        .ok_or(Error::Unauthorized)?;

    req.extensions_mut().insert(id);

    Ok(next.run(req).await)
}
