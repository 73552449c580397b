//! Database row types — these map directly to SQLite rows.
//! Distinct from the panel-types API models to keep the DB layer independent.

pub struct AdminRow {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub created_at: String,
}

pub struct PackageRow {
    pub id: i64,
    pub name: String,
    pub channels: Option<i64>,
    pub duration: Option<i64>,
    pub price: Option<f64>,
    pub status: String,
    pub created_at: String,
    /// Derived: count of users on this package with status 'active'.
    pub subscribers: i64,
}

pub struct UserRow {
    pub id: i64,
    pub username: String,
    pub password: String,
    pub package_id: Option<i64>,
    /// From the LEFT JOIN to packages; None when the reference dangles.
    pub package_name: Option<String>,
    pub device: Option<String>,
    pub status: String,
    pub expiry_date: Option<String>,
    pub last_seen: Option<String>,
    pub created_at: String,
}

pub struct ChannelRow {
    pub id: i64,
    pub name: String,
    pub url: Option<String>,
    pub logo: Option<String>,
    pub category: Option<String>,
    pub package_id: Option<i64>,
}

pub struct ActivityRow {
    pub id: i64,
    pub username: String,
    pub device: Option<String>,
    pub status: String,
    pub last_seen: String,
}

pub struct StatsRow {
    pub total_revenue: f64,
    pub today_revenue: f64,
    pub active_users: i64,
    pub new_users_this_week: i64,
    pub total_channels: i64,
    pub total_packages: i64,
}
