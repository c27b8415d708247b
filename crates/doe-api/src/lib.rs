//! HTTP handlers for the donation backend, v1 contract under `/api`.
//!
//! Every handler does at most one store operation, run on the blocking pool.
//! There are no cross-request transactions, so two leaderboard reads racing a
//! donation may see different totals.

pub mod admin;
pub mod auth;
pub mod donations;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod password;
pub mod seed;
pub mod token;
pub mod validate;

use axum::{
    Json, Router,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tracing::error;

use crate::auth::AppState;
use crate::error::ApiError;

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/register", post(auth::register))
        .route("/api/login", post(auth::login))
        .route("/api/donate", post(donations::donate))
        .route("/api/leaderboard", get(donations::leaderboard))
        .route("/health", get(health));

    let admin_routes = Router::new()
        .route("/api/admin/users", get(admin::list_users))
        .layer(from_fn_with_state(state.clone(), middleware::require_admin));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Run blocking store work off the async runtime.
pub(crate) async fn run_blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Store(anyhow::anyhow!("blocking task failed: {}", e))
        })?
        .map_err(ApiError::Store)
}
