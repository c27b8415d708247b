use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::{info, warn};

use doe_db::Database;
use doe_db::models::UserRow;
use doe_types::api::{AuthResponse, LoginRequest, RegisterRequest};
use doe_types::models::User;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::token::create_token;
use crate::{password, run_blocking, validate};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
}

pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = validate::required(req.username, "username")?;
    let email = validate::required(req.email, "email")?;
    let password = validate::required(req.password, "password")?;

    // Hashing is CPU-bound, so it runs on the blocking pool with the insert.
    let db = state.clone();
    let (u, e) = (username.clone(), email.clone());
    let user_id = run_blocking(move || {
        let password_hash = password::hash_password(&password)?;
        db.db.create_user(&u, &e, &password_hash)
    })
    .await?
    .ok_or(ApiError::Duplicate)?;

    let user = User {
        id: user_id,
        username,
        email,
        is_admin: false,
    };
    let token = create_token(&state.jwt_secret, &user, state.token_ttl)?;

    info!("Registered user '{}' (id {})", user.username, user.id);
    Ok((StatusCode::CREATED, Json(AuthResponse { user, token })))
}

/// `username` in the request may be either a username or an email.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let identifier = validate::required(req.username, "username")?;
    let password = validate::required(req.password, "password")?;

    let db = state.clone();
    let ident = identifier.clone();
    let matched: Option<UserRow> = run_blocking(move || {
        let candidates = db.db.login_candidates(&ident)?;
        if candidates.is_empty() {
            password::verify_without_account(&password);
            return Ok(None);
        }
        Ok(candidates
            .into_iter()
            .find(|row| password::verify_password(&password, &row.password)))
    })
    .await?;

    let Some(row) = matched else {
        warn!("Rejected login for '{}'", identifier);
        return Err(ApiError::Auth);
    };

    let user = User {
        id: row.id,
        username: row.username,
        email: row.email,
        is_admin: row.is_admin,
    };
    let token = create_token(&state.jwt_secret, &user, state.token_ttl)?;

    info!("User '{}' logged in (admin: {})", user.username, user.is_admin);
    Ok(Json(AuthResponse { user, token }))
}
