use crate::Database;
use crate::models::{LeaderboardRow, UserRow, UserSummaryRow};
use anyhow::Result;
use rusqlite::{Connection, ffi};

impl Database {
    // -- Users --

    /// Insert a regular user. Returns `None` when the username or the email
    /// is already taken; uniqueness is enforced by the table constraints so
    /// there is no check-then-insert window.
    pub fn create_user(&self, username: &str, email: &str, password_hash: &str) -> Result<Option<i64>> {
        self.with_conn_mut(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (username, email, password) VALUES (?1, ?2, ?3)",
                (username, email, password_hash),
            );

            match inserted {
                Ok(_) => Ok(Some(conn.last_insert_rowid())),
                Err(e) if is_unique_violation(&e) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Insert-if-absent, keyed on the username/email constraints.
    /// Returns whether a row was written.
    pub fn seed_user(&self, username: &str, email: &str, password_hash: &str, is_admin: bool) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "INSERT OR IGNORE INTO users (username, email, password, is_admin) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![username, email, password_hash, is_admin],
            )?;
            Ok(changed > 0)
        })
    }

    /// Rows an identifier could log in as, most specific first: exact
    /// username, then exact email, then administrator rows whose username
    /// matches ignoring case.
    pub fn login_candidates(&self, identifier: &str) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| query_login_candidates(conn, identifier))
    }

    pub fn list_users(&self) -> Result<Vec<UserSummaryRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT id, COALESCE(username, ''), COALESCE(email, '') FROM users ORDER BY id ASC")?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(UserSummaryRow {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        email: row.get(2)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Donations --

    /// Append one donation. `created_at` is supplied by the caller so the
    /// timestamp is taken at request time.
    pub fn insert_donation(&self, username: &str, amount: f64, created_at: &str) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO donations (username, amount, created_at) VALUES (?1, ?2, ?3)",
                rusqlite::params![username, amount, created_at],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn count_donations(&self) -> Result<i64> {
        self.with_conn(|conn| {
            let count = conn.query_row("SELECT COUNT(*) FROM donations", [], |row| row.get(0))?;
            Ok(count)
        })
    }

    /// Per-username donation totals, largest first. Order among equal totals
    /// is whatever SQLite produces and is not part of the contract.
    pub fn top_donors(&self, limit: u32) -> Result<Vec<LeaderboardRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT username, SUM(amount) AS total_amount
                 FROM donations
                 GROUP BY username
                 ORDER BY total_amount DESC
                 LIMIT ?1",
            )?;
            let rows = stmt
                .query_map([limit], |row| {
                    Ok(LeaderboardRow {
                        username: row.get(0)?,
                        total_amount: row.get(1)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn query_login_candidates(conn: &Connection, identifier: &str) -> Result<Vec<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, COALESCE(username, ''), COALESCE(email, ''), COALESCE(password, ''), is_admin
         FROM users
         WHERE username = ?1
            OR email = ?1
            OR (is_admin = 1 AND username = ?1 COLLATE NOCASE)
         ORDER BY CASE
                      WHEN username = ?1 THEN 0
                      WHEN email = ?1 THEN 1
                      ELSE 2
                  END,
                  id",
    )?;

    let rows = stmt
        .query_map([identifier], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                email: row.get(2)?,
                password: row.get(3)?,
                is_admin: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Only UNIQUE failures mean "already taken"; NOT NULL and CHECK failures
/// are real errors.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
