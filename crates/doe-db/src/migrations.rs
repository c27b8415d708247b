use anyhow::{Result, bail};
use rusqlite::Connection;
use tracing::{error, info, warn};

/// Each table is created by its own batch so that one failure does not mask
/// the outcome of the other.
const TABLES: &[(&str, &str)] = &[
    (
        "users",
        "
        CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            username    TEXT NOT NULL UNIQUE,
            email       TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            is_admin    INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    ),
    (
        "donations",
        "
        CREATE TABLE IF NOT EXISTS donations (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            username    TEXT NOT NULL,
            amount      REAL NOT NULL CHECK (amount > 0),
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_donations_username
            ON donations(username);
        ",
    ),
];

pub fn run(conn: &Connection) -> Result<()> {
    let mut failed = Vec::new();

    for (name, ddl) in TABLES {
        match conn.execute_batch(ddl) {
            Ok(()) => info!("Table '{}' ready", name),
            Err(e) => {
                error!("Failed to create table '{}': {}", name, e);
                failed.push(*name);
            }
        }
    }

    if !failed.is_empty() {
        bail!("schema setup failed for table(s): {}", failed.join(", "));
    }

    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;
    let version: i64 =
        conn.query_row("SELECT COALESCE(MAX(version), 0) FROM schema_version", [], |r| r.get(0))?;

    if version < 1 {
        info!("Running migration v1 (upgrade original table layout)");
        let tx = conn.unchecked_transaction()?;
        upgrade_original_layout(&tx)?;
        tx.execute("INSERT INTO schema_version (version) VALUES (1)", [])?;
        tx.commit()?;
    }

    info!("Database migrations complete");
    Ok(())
}

/// Database files from the first release of the site have no
/// `users.is_admin` and store the donation time in `donations.date`.
/// `CREATE TABLE IF NOT EXISTS` leaves those tables alone, so the columns
/// are fixed up here. On a fresh file every check is a no-op.
///
/// Passwords in those files are plaintext. They are kept but can never
/// verify against argon2, so those users must re-register.
fn upgrade_original_layout(conn: &Connection) -> Result<()> {
    let user_columns = column_names(conn, "users")?;
    if !user_columns.iter().any(|c| c == "is_admin") {
        conn.execute_batch("ALTER TABLE users ADD COLUMN is_admin INTEGER NOT NULL DEFAULT 0;")?;
        info!("Added users.is_admin");
    }
    if !user_columns.iter().any(|c| c == "created_at") {
        // ALTER TABLE cannot add a column with a non-constant default.
        conn.execute_batch("ALTER TABLE users ADD COLUMN created_at TEXT;")?;
        info!("Added users.created_at");
    }

    let donation_columns = column_names(conn, "donations")?;
    if !donation_columns.iter().any(|c| c == "created_at") {
        if donation_columns.iter().any(|c| c == "date") {
            conn.execute_batch("ALTER TABLE donations RENAME COLUMN date TO created_at;")?;
            info!("Renamed donations.date to donations.created_at");
        } else {
            conn.execute_batch("ALTER TABLE donations ADD COLUMN created_at TEXT;")?;
            info!("Added donations.created_at");
        }
    }

    let plaintext: i64 = conn.query_row(
        "SELECT COUNT(*) FROM users WHERE password IS NULL OR password NOT LIKE '$argon2%'",
        [],
        |r| r.get(0),
    )?;
    if plaintext > 0 {
        warn!("{} user(s) have unhashed passwords and cannot log in until they re-register", plaintext);
    }

    Ok(())
}

fn column_names(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
    let names = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(names)
}
