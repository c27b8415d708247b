use axum::{Extension, Json, extract::State, response::IntoResponse};
use tracing::debug;

use doe_types::api::Claims;
use doe_types::models::UserSummary;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::run_blocking;

/// All users, oldest first. Only reachable through `require_admin`.
pub async fn list_users(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let rows = run_blocking(move || db.db.list_users()).await?;

    debug!("Admin '{}' listed {} users", claims.username, rows.len());

    let users: Vec<UserSummary> = rows
        .into_iter()
        .map(|row| UserSummary {
            id: row.id,
            username: row.username,
            email: row.email,
        })
        .collect();

    Ok(Json(users))
}
