use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rollcall_common::api::ErrorResponse;
use rollcall_common::Error;
use tracing::error;

/// Errors returned by the API handlers
#[derive(Debug)]
pub enum ApiError {
    /// Unknown partition or unusable payload
    BadRequest(String),
    Store(Error),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Store(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Malformed payload: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Store(err) => {
                error!("Store error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, format!("Store error: {}", err))
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
