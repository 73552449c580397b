//! First-start bootstrap: a default admin, three packages, and a handful of
//! demo subscribers. Each group is inserted only when its table is empty, so
//! running the seed on every startup is safe.
//!
//! The password hasher is injected so this crate stays free of the
//! credential stack.

use crate::Database;
use anyhow::Result;
use tracing::info;

pub fn run<F>(db: &Database, hash: F) -> Result<()>
where
    F: Fn(&str) -> Result<String>,
{
    db.with_conn(|conn| {
        let admins: i64 = conn.query_row("SELECT COUNT(*) FROM admins", [], |r| r.get(0))?;
        if admins == 0 {
            conn.execute(
                "INSERT INTO admins (username, password, email) VALUES (?1, ?2, ?3)",
                rusqlite::params!["admin", hash("admin123")?, "admin@example.com"],
            )?;
            info!("Seeded default admin account");
        }

        let packages: i64 = conn.query_row("SELECT COUNT(*) FROM packages", [], |r| r.get(0))?;
        if packages == 0 {
            let mut stmt = conn.prepare(
                "INSERT INTO packages (name, channels, duration, price) VALUES (?1, ?2, ?3, ?4)",
            )?;
            stmt.execute(rusqlite::params!["Basic", 120, 30, 9.99])?;
            stmt.execute(rusqlite::params!["Standard", 300, 30, 14.99])?;
            stmt.execute(rusqlite::params!["Premium", 600, 90, 29.99])?;
            info!("Seeded default packages");
        }

        let users: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))?;
        if users == 0 {
            let mut stmt = conn.prepare(
                "INSERT INTO users
                    (username, password, package_id, device, status, expiry_date, last_seen)
                 VALUES
                    (?1, ?2, ?3, ?4, ?5,
                     datetime('now', ?6 || ' days'),
                     datetime('now', ?7 || ' minutes'))",
            )?;
            let demo = hash("iptv123")?;
            stmt.execute(rusqlite::params!["john_tv", demo, 1, "MAG 254", "active", 25, -5])?;
            stmt.execute(rusqlite::params!["maria_hd", demo, 2, "Android Box", "active", 18, -180])?;
            stmt.execute(rusqlite::params!["alex_stream", demo, 3, "Smart TV", "active", 80, -2880])?;
            stmt.execute(rusqlite::params!["old_client", demo, 1, "Firestick", "expired", -12, -17280])?;
            info!("Seeded demo subscribers");
        }

        Ok(())
    })
}
