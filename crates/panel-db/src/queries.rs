use crate::Database;
use crate::models::{ActivityRow, AdminRow, ChannelRow, PackageRow, StatsRow, UserRow};
use anyhow::Result;

/// Package projection with the derived subscriber count. The count is a
/// correlated subquery recomputed on every read, never cached.
const PACKAGE_SELECT: &str = "
    SELECT p.id, p.name, p.channels, p.duration, p.price, p.status, p.created_at,
           (SELECT COUNT(*) FROM users u
             WHERE u.package_id = p.id AND u.status = 'active') AS subscribers
    FROM packages p";

const USER_SELECT: &str = "
    SELECT u.id, u.username, u.password, u.package_id, p.name, u.device,
           u.status, u.expiry_date, u.last_seen, u.created_at
    FROM users u
    LEFT JOIN packages p ON u.package_id = p.id";

impl Database {
    // -- Admins --

    pub fn create_admin(
        &self,
        username: &str,
        password_hash: &str,
        email: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO admins (username, password, email) VALUES (?1, ?2, ?3)",
                rusqlite::params![username, password_hash, email],
            )?;
            Ok(())
        })
    }

    pub fn get_admin_by_username(&self, username: &str) -> Result<Option<AdminRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, username, password, email, created_at
                 FROM admins WHERE username = ?1",
                [username],
                |row| {
                    Ok(AdminRow {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password: row.get(2)?,
                        email: row.get(3)?,
                        created_at: row.get(4)?,
                    })
                },
            )
            .optional()
        })
    }

    // -- Packages --

    pub fn list_packages(&self) -> Result<Vec<PackageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{PACKAGE_SELECT} ORDER BY p.id"))?;
            let rows = stmt
                .query_map([], package_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_package(&self, id: i64) -> Result<Option<PackageRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("{PACKAGE_SELECT} WHERE p.id = ?1"),
                [id],
                package_from_row,
            )
            .optional()
        })
    }

    pub fn create_package(
        &self,
        name: &str,
        channels: Option<i64>,
        duration: Option<i64>,
        price: Option<f64>,
    ) -> Result<PackageRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO packages (name, channels, duration, price) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![name, channels, duration, price],
            )?;
            let id = conn.last_insert_rowid();
            let row = conn.query_row(
                &format!("{PACKAGE_SELECT} WHERE p.id = ?1"),
                [id],
                package_from_row,
            )?;
            Ok(row)
        })
    }

    /// Full-replace update. Returns the affected-row count; zero means the
    /// package does not exist.
    pub fn update_package(
        &self,
        id: i64,
        name: &str,
        channels: Option<i64>,
        duration: Option<i64>,
        price: Option<f64>,
        status: &str,
    ) -> Result<usize> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE packages SET name = ?1, channels = ?2, duration = ?3, price = ?4, status = ?5
                 WHERE id = ?6",
                rusqlite::params![name, channels, duration, price, status, id],
            )?;
            Ok(n)
        })
    }

    pub fn delete_package(&self, id: i64) -> Result<usize> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM packages WHERE id = ?1", [id])?;
            Ok(n)
        })
    }

    /// Duration in days of a package, None when the package is missing or
    /// has no duration set. Used to compute subscriber expiry on create.
    pub fn package_duration(&self, id: i64) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            let duration: Option<Option<i64>> = conn
                .query_row("SELECT duration FROM packages WHERE id = ?1", [id], |row| {
                    row.get(0)
                })
                .optional()?;
            Ok(duration.flatten())
        })
    }

    // -- Users --

    pub fn list_users(&self) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{USER_SELECT} ORDER BY u.id"))?;
            let rows = stmt
                .query_map([], user_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("{USER_SELECT} WHERE u.username = ?1"),
                [username],
                user_from_row,
            )
            .optional()
        })
    }

    /// Insert a subscriber. Initial status is always 'active' regardless of
    /// caller input; the password must already be hashed.
    pub fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        package_id: Option<i64>,
        device: Option<&str>,
        expiry_date: &str,
    ) -> Result<UserRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, password, package_id, device, status, expiry_date)
                 VALUES (?1, ?2, ?3, ?4, 'active', ?5)",
                rusqlite::params![username, password_hash, package_id, device, expiry_date],
            )?;
            let id = conn.last_insert_rowid();
            let row = conn.query_row(
                &format!("{USER_SELECT} WHERE u.id = ?1"),
                [id],
                user_from_row,
            )?;
            Ok(row)
        })
    }

    pub fn update_user(
        &self,
        id: i64,
        package_id: Option<i64>,
        device: Option<&str>,
        status: &str,
    ) -> Result<usize> {
        self.with_conn(|conn| {
            let n = conn.execute(
                "UPDATE users SET package_id = ?1, device = ?2, status = ?3 WHERE id = ?4",
                rusqlite::params![package_id, device, status, id],
            )?;
            Ok(n)
        })
    }

    pub fn delete_user(&self, id: i64) -> Result<usize> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
            Ok(n)
        })
    }

    /// Stamp a subscriber's last_seen with the current time. Called on every
    /// subscriber login.
    pub fn touch_last_seen(&self, id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE users SET last_seen = datetime('now') WHERE id = ?1",
                [id],
            )?;
            Ok(())
        })
    }

    /// Most recently seen subscribers, newest first. Users that have never
    /// logged in (NULL last_seen) are excluded.
    pub fn recent_activity(&self, limit: u32) -> Result<Vec<ActivityRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, username, device, status, last_seen
                 FROM users
                 WHERE last_seen IS NOT NULL
                 ORDER BY last_seen DESC
                 LIMIT ?1",
            )?;
            let rows = stmt
                .query_map([limit], |row| {
                    Ok(ActivityRow {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        device: row.get(2)?,
                        status: row.get(3)?,
                        last_seen: row.get(4)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Channels --

    pub fn channels_by_package(&self, package_id: i64) -> Result<Vec<ChannelRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, url, logo, category, package_id
                 FROM channels WHERE package_id = ?1 ORDER BY id",
            )?;
            let rows = stmt
                .query_map([package_id], channel_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn create_channel(
        &self,
        name: &str,
        url: Option<&str>,
        logo: Option<&str>,
        category: Option<&str>,
        package_id: Option<i64>,
    ) -> Result<ChannelRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO channels (name, url, logo, category, package_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                rusqlite::params![name, url, logo, category, package_id],
            )?;
            let id = conn.last_insert_rowid();
            let row = conn.query_row(
                "SELECT id, name, url, logo, category, package_id FROM channels WHERE id = ?1",
                [id],
                channel_from_row,
            )?;
            Ok(row)
        })
    }

    pub fn delete_channel(&self, id: i64) -> Result<usize> {
        self.with_conn(|conn| {
            let n = conn.execute("DELETE FROM channels WHERE id = ?1", [id])?;
            Ok(n)
        })
    }

    // -- Transactions --

    /// Append a revenue record. No HTTP route calls this: it is the
    /// interface an external payment process records through.
    pub fn record_transaction(
        &self,
        user_id: Option<i64>,
        package_id: Option<i64>,
        amount: f64,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO transactions (user_id, package_id, amount, status)
                 VALUES (?1, ?2, ?3, 'completed')",
                rusqlite::params![user_id, package_id, amount],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    // -- Dashboard --

    /// Six independent aggregates composed as one explicit sequence. Any
    /// failure propagates and fails the whole stats request.
    pub fn dashboard_stats(&self) -> Result<StatsRow> {
        self.with_conn(|conn| {
            let total_revenue: f64 = conn.query_row(
                "SELECT COALESCE(SUM(amount), 0) FROM transactions WHERE status = 'completed'",
                [],
                |row| row.get(0),
            )?;
            let today_revenue: f64 = conn.query_row(
                "SELECT COALESCE(SUM(amount), 0) FROM transactions
                 WHERE status = 'completed' AND date(created_at) = date('now')",
                [],
                |row| row.get(0),
            )?;
            let active_users: i64 = conn.query_row(
                "SELECT COUNT(*) FROM users WHERE status = 'active'",
                [],
                |row| row.get(0),
            )?;
            let new_users_this_week: i64 = conn.query_row(
                "SELECT COUNT(*) FROM users WHERE created_at >= datetime('now', '-7 days')",
                [],
                |row| row.get(0),
            )?;
            let total_channels: i64 =
                conn.query_row("SELECT COUNT(*) FROM channels", [], |row| row.get(0))?;
            let total_packages: i64 =
                conn.query_row("SELECT COUNT(*) FROM packages", [], |row| row.get(0))?;

            Ok(StatsRow {
                total_revenue,
                today_revenue,
                active_users,
                new_users_this_week,
                total_channels,
                total_packages,
            })
        })
    }
}

fn package_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PackageRow> {
    Ok(PackageRow {
        id: row.get(0)?,
        name: row.get(1)?,
        channels: row.get(2)?,
        duration: row.get(3)?,
        price: row.get(4)?,
        status: row.get(5)?,
        created_at: row.get(6)?,
        subscribers: row.get(7)?,
    })
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        password: row.get(2)?,
        package_id: row.get(3)?,
        package_name: row.get(4)?,
        device: row.get(5)?,
        status: row.get(6)?,
        expiry_date: row.get(7)?,
        last_seen: row.get(8)?,
        created_at: row.get(9)?,
    })
}

fn channel_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ChannelRow> {
    Ok(ChannelRow {
        id: row.get(0)?,
        name: row.get(1)?,
        url: row.get(2)?,
        logo: row.get(3)?,
        category: row.get(4)?,
        package_id: row.get(5)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
