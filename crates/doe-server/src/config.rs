use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Placeholder secrets that are accepted for local runs but warned about.
pub const PLACEHOLDER_SECRETS: &[&str] = &["dev-secret-change-me", "change-me-to-a-random-string"];

pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub admin_email: String,
    pub admin_password: String,
    pub seed_fixtures: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: var_or("DOE_HOST", "0.0.0.0"),
            port: parse_var("DOE_PORT", 3000)?,
            db_path: var_or("DOE_DB_PATH", "doe1real.db").into(),
            jwt_secret: var_or("DOE_JWT_SECRET", "dev-secret-change-me"),
            token_ttl_hours: parse_var("DOE_TOKEN_TTL_HOURS", 24)?,
            admin_email: var_or("DOE_ADMIN_EMAIL", "admin@doe1real.local"),
            admin_password: var_or("DOE_ADMIN_PASSWORD", "12345678"),
            seed_fixtures: parse_var("DOE_SEED_FIXTURES", false)?,
        })
    }

    pub fn uses_placeholder_secret(&self) -> bool {
        PLACEHOLDER_SECRETS.contains(&self.jwt_secret.as_str())
    }
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.into())
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {}: {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}
