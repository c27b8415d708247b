//! Database row types. These map directly to SQLite rows and are kept
//! separate from the doe-types wire models.

pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// argon2 PHC string, never plaintext.
    pub password: String,
    pub is_admin: bool,
}

/// Listing projection of `users`. Has no password column on purpose.
pub struct UserSummaryRow {
    pub id: i64,
    pub username: String,
    pub email: String,
}

pub struct LeaderboardRow {
    pub username: String,
    pub total_amount: f64,
}
