use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

/// Everything a handler can fail with.
///
/// Validation and business-rule failures carry their reason to the caller.
/// Store failures are logged and reported with a generic message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error(transparent)]
    InvalidBody(#[from] JsonRejection),

    #[error("store error: {0:#}")]
    Store(anyhow::Error),
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        ApiError::Store(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason).into_response(),
            ApiError::NotFound(reason) => (StatusCode::NOT_FOUND, reason).into_response(),
            ApiError::InvalidBody(rejection) => {
                (StatusCode::BAD_REQUEST, rejection.body_text()).into_response()
            }
            ApiError::Store(e) => {
                error!("Store error: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
