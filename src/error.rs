use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::error;
use serde::Serialize;

use crate::{contact, message, thread, user};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("authentication required")]
    Unauthorized,
    #[error("query param required: {0}")]
    QueryParamRequired(String),

    #[error(transparent)]
    _Contact(#[from] contact::Error),
    #[error(transparent)]
    _Message(#[from] message::Error),
    #[error(transparent)]
    _Thread(#[from] thread::Error),
    #[error(transparent)]
    _User(#[from] user::Error),
}

impl Error {
    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::QueryParamRequired(_) => StatusCode::BAD_REQUEST,
            Self::_Contact(e) => contact_status(e),
            Self::_Message(e) => message_status(e),
            Self::_Thread(e) => thread_status(e),
            Self::_User(e) => user_status(e),
        }
    }
}

fn thread_status(e: &thread::Error) -> StatusCode {
    match e {
        thread::Error::NotFound(_) => StatusCode::NOT_FOUND,
        thread::Error::AlreadyExists(_) => StatusCode::CONFLICT,
        thread::Error::NotMember => StatusCode::FORBIDDEN,
        thread::Error::SameParticipants(_) | thread::Error::BlankParticipant => {
            StatusCode::BAD_REQUEST
        }
        thread::Error::_User(e) => user_status(e),
    }
}

fn message_status(e: &message::Error) -> StatusCode {
    match e {
        message::Error::EmptyText => StatusCode::BAD_REQUEST,
        message::Error::_Thread(e) => thread_status(e),
    }
}

fn user_status(e: &user::Error) -> StatusCode {
    match e {
        user::Error::NotFound(_) => StatusCode::NOT_FOUND,
    }
}

fn contact_status(e: &contact::Error) -> StatusCode {
    match e {
        contact::Error::_Thread(e) => thread_status(e),
        contact::Error::_Message(e) => message_status(e),
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            message: String,
        }

        let status = self.status();

        let message = if status.is_server_error() {
            error!("internal error: {self:?}");
            "Something went wrong".to_owned()
        } else {
            self.to_string()
        };

        (status, Json(ErrorResponse { message })).into_response()
    }
}
