use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use doe_types::api::ErrorResponse;

/// Every failure a handler can produce. The `Display` text is the message
/// sent to the client, so store details never leak into it.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("Username or email already registered.")]
    Duplicate,

    /// Same response whether the identifier or the password was wrong.
    #[error("Invalid username or password.")]
    Auth,

    #[error("Missing or invalid session token.")]
    Unauthorized,

    #[error("Administrator access required.")]
    Forbidden,

    #[error("Internal server error.")]
    Store(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Duplicate => StatusCode::BAD_REQUEST,
            ApiError::Auth | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Store(e) = &self {
            error!("Store failure: {:#}", e);
        }

        let status = self.status();
        (status, Json(ErrorResponse { message: self.to_string() })).into_response()
    }
}
