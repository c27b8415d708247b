use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::User;

// -- Session tokens --

/// Claims carried by the bearer token issued on register and login.
/// `admin` is the capability checked by the admin routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    pub admin: bool,
    pub exp: usize,
}

// -- Auth --

/// Fields are optional so that a missing field surfaces as a readable
/// validation message instead of a deserialization failure.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// `username` may also hold an email address.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Response body for both register and login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

// -- Donations --

/// `amount` stays untyped until validation so that strings, nulls and
/// negative numbers all map to the same 400 response.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DonateRequest {
    pub username: Option<String>,
    pub amount: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonateResponse {
    pub message: String,
    pub donation_id: i64,
    pub qr_code_data: String,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}
