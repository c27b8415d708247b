use anyhow::Result;
use tracing::info;

use doe_db::Database;

use crate::password::hash_password;

pub const ADMIN_USERNAME: &str = "admin";

pub struct AdminCredentials {
    pub email: String,
    pub password: String,
}

/// Create the administrator row once. An existing row (by username or
/// email) is left untouched, including its password.
pub fn ensure_admin(db: &Database, creds: &AdminCredentials) -> Result<()> {
    let hash = hash_password(&creds.password)?;
    if db.seed_user(ADMIN_USERNAME, &creds.email, &hash, true)? {
        info!("Seeded administrator account '{}'", ADMIN_USERNAME);
    } else {
        info!("Administrator account already present");
    }
    Ok(())
}

/// Demo rows for local development. Donations are only added to an empty
/// ledger, since the table has no natural key to dedupe them on.
pub fn load_fixtures(db: &Database) -> Result<()> {
    let hash = hash_password("password123")?;
    if db.seed_user("tester", "tester@example.com", &hash, false)? {
        info!("Fixture user 'tester' created");
    }

    if db.count_donations()? > 0 {
        info!("Donations present, skipping donation fixtures");
        return Ok(());
    }

    let now = chrono::Utc::now().to_rfc3339();
    for (username, amount) in [("tester", 5.0), ("generous-user", 20.0), ("tester", 2.0)] {
        db.insert_donation(username, amount, &now)?;
    }
    info!("Fixture donations loaded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::verify_password;

    /// Database in a temp file, removed together with its WAL files on drop.
    struct TempDb {
        db: Database,
        path: std::path::PathBuf,
    }

    impl TempDb {
        fn new() -> Self {
            let path = std::env::temp_dir().join(format!("doe_seed_test_{}.db", uuid::Uuid::new_v4()));
            let db = Database::open(&path).unwrap();
            Self { db, path }
        }
    }

    impl Drop for TempDb {
        fn drop(&mut self) {
            for suffix in ["", "-wal", "-shm"] {
                let _ = std::fs::remove_file(format!("{}{}", self.path.display(), suffix));
            }
        }
    }

    #[test]
    fn admin_seed_keeps_the_first_password() {
        let t = TempDb::new();
        let db = &t.db;
        let creds = |password: &str| AdminCredentials {
            email: "admin@example.com".into(),
            password: password.into(),
        };

        ensure_admin(db, &creds("first")).unwrap();
        ensure_admin(db, &creds("second")).unwrap();

        let rows = db.login_candidates(ADMIN_USERNAME).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_admin);
        assert!(verify_password("first", &rows[0].password));
        assert!(!verify_password("second", &rows[0].password));
    }

    #[test]
    fn temp_files_are_removed_on_drop() {
        let t = TempDb::new();
        let path = t.path.clone();
        assert!(path.exists());
        drop(t);
        assert!(!path.exists());
    }

    #[test]
    fn fixtures_load_once() {
        let t = TempDb::new();
        let db = &t.db;

        load_fixtures(db).unwrap();
        load_fixtures(db).unwrap();

        assert_eq!(db.count_donations().unwrap(), 3);
        let top = db.top_donors(10).unwrap();
        assert_eq!(top[0].username, "generous-user");
        assert_eq!(top[1].username, "tester");
        assert_eq!(top[1].total_amount, 7.0);

        let tester = db.login_candidates("tester@example.com").unwrap();
        assert!(verify_password("password123", &tester[0].password));
    }
}
