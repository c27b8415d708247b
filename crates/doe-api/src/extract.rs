use axum::extract::FromRequest;

use crate::error::ApiError;

/// `axum::Json` whose rejections become `ApiError::Validation`, so malformed
/// bodies get the usual `{message}` 400 instead of a plaintext 415/422.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
