use serde::{Deserialize, Serialize};

// -- JWT Claims --

/// JWT claims shared between the login handlers (which issue tokens) and the
/// auth middleware (which validates them). Canonical definition lives here in
/// panel-types to eliminate duplication.
///
/// `kind` is serialized as `type`: `"user"` for subscriber tokens, absent for
/// admin tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub username: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AdminLoginResponse {
    pub token: String,
    pub admin: AdminInfo,
}

#[derive(Debug, Serialize)]
pub struct AdminInfo {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserLoginResponse {
    pub token: String,
    pub user: SubscriberInfo,
}

#[derive(Debug, Serialize)]
pub struct SubscriberInfo {
    pub id: i64,
    pub username: String,
    pub package_id: Option<i64>,
    pub status: String,
    pub expiry_date: Option<String>,
}

// -- Packages --

#[derive(Debug, Deserialize)]
pub struct CreatePackageRequest {
    pub name: String,
    pub channels: Option<i64>,
    pub duration: Option<i64>,
    pub price: Option<f64>,
}

/// Full-replace update: every listed mutable field is written as given.
#[derive(Debug, Deserialize)]
pub struct UpdatePackageRequest {
    pub name: String,
    pub channels: Option<i64>,
    pub duration: Option<i64>,
    pub price: Option<f64>,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct PackageResponse {
    pub id: i64,
    pub name: String,
    pub channels: Option<i64>,
    pub duration: Option<i64>,
    pub price: Option<f64>,
    pub status: String,
    pub created_at: String,
    /// Count of users referencing this package with status `active`,
    /// recomputed on every list/get.
    pub subscribers: i64,
}

// -- Users --

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub package_id: Option<i64>,
    pub device: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub package_id: Option<i64>,
    pub device: Option<String>,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub package_id: Option<i64>,
    /// Display name of the referenced package; null when the reference
    /// dangles.
    pub package_name: Option<String>,
    pub device: Option<String>,
    pub status: String,
    pub expiry_date: Option<String>,
    pub last_seen: Option<String>,
    pub created_at: String,
}

// -- Channels --

#[derive(Debug, Deserialize)]
pub struct CreateChannelRequest {
    pub name: String,
    pub url: Option<String>,
    pub logo: Option<String>,
    pub category: Option<String>,
    pub package_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ChannelResponse {
    pub id: i64,
    pub name: String,
    pub url: Option<String>,
    pub logo: Option<String>,
    pub category: Option<String>,
    pub package_id: Option<i64>,
}

// -- Dashboard --

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_revenue: f64,
    pub today_revenue: f64,
    pub active_users: i64,
    pub new_users_this_week: i64,
    pub total_channels: i64,
    pub total_packages: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEntry {
    pub id: i64,
    pub username: String,
    pub device: Option<String>,
    pub status: String,
    /// Relative time string, e.g. "5 min ago" / "3 hours ago" / "2 days ago".
    pub last_seen: String,
}

// -- Generic acknowledgement for updates/deletes --

#[derive(Debug, Serialize)]
pub struct Ack {
    pub message: String,
}

impl Ack {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
