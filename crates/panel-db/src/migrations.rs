use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS admins (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            username    TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            email       TEXT,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS packages (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            channels    INTEGER,
            duration    INTEGER,
            price       REAL,
            status      TEXT NOT NULL DEFAULT 'active',
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            username    TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            package_id  INTEGER REFERENCES packages(id),
            device      TEXT,
            status      TEXT NOT NULL DEFAULT 'active',
            expiry_date TEXT,
            last_seen   TEXT,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_users_package
            ON users(package_id, status);

        CREATE INDEX IF NOT EXISTS idx_users_last_seen
            ON users(last_seen);

        CREATE TABLE IF NOT EXISTS channels (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            url         TEXT,
            logo        TEXT,
            category    TEXT,
            package_id  INTEGER REFERENCES packages(id)
        );

        CREATE INDEX IF NOT EXISTS idx_channels_package
            ON channels(package_id);

        CREATE TABLE IF NOT EXISTS transactions (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id     INTEGER REFERENCES users(id),
            package_id  INTEGER REFERENCES packages(id),
            amount      REAL,
            status      TEXT NOT NULL DEFAULT 'completed',
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_transactions_status
            ON transactions(status, created_at);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
