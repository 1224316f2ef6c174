use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::db::StoreError;
use crate::web::pages;

/// Request-terminating failures. Persistence errors that should keep the
/// operator on the form are handled inline by the handlers and never reach
/// this type.
#[derive(Debug)]
pub enum WebError {
    /// Missing record, unmatched route, or an actor the gate turned away.
    /// They all render the same page on purpose.
    NotFound,

    Internal(String),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => {
                (StatusCode::NOT_FOUND, Html(pages::not_found())).into_response()
            }
            Self::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(pages::internal_error()),
                )
                    .into_response()
            }
        }
    }
}

impl From<StoreError> for WebError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound,
            other => Self::Internal(other.to_string()),
        }
    }
}
