use axum::{Json, extract::State};
use chrono::{DateTime, NaiveDateTime, Utc};

use panel_types::api::{ActivityEntry, DashboardStats};

use crate::auth::AppState;
use crate::blocking;
use crate::error::ApiError;

const ACTIVITY_LIMIT: u32 = 10;

/// GET /api/dashboard/stats — six independent aggregates merged into one
/// payload. Any failing aggregate fails the whole request with a 500.
pub async fn stats(State(state): State<AppState>) -> Result<Json<DashboardStats>, ApiError> {
    let db = state.clone();
    let row = blocking(move || db.db.dashboard_stats()).await?;

    Ok(Json(DashboardStats {
        total_revenue: row.total_revenue,
        today_revenue: row.today_revenue,
        active_users: row.active_users,
        new_users_this_week: row.new_users_this_week,
        total_channels: row.total_channels,
        total_packages: row.total_packages,
    }))
}

/// GET /api/dashboard/activity — the 10 most recently seen subscribers,
/// last_seen rendered as a relative-time string.
pub async fn activity(State(state): State<AppState>) -> Result<Json<Vec<ActivityEntry>>, ApiError> {
    let db = state.clone();
    let rows = blocking(move || db.db.recent_activity(ACTIVITY_LIMIT)).await?;

    let now = Utc::now();
    let entries = rows
        .into_iter()
        .map(|row| ActivityEntry {
            id: row.id,
            username: row.username,
            device: row.device,
            status: row.status,
            last_seen: relative_time(&row.last_seen, now),
        })
        .collect();

    Ok(Json(entries))
}

/// Render a stored UTC timestamp relative to `now`, truncating toward the
/// coarser unit: minutes under an hour, hours under a day, days otherwise.
fn relative_time(timestamp: &str, now: DateTime<Utc>) -> String {
    let Ok(parsed) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S") else {
        return timestamp.to_string();
    };

    let elapsed = now - parsed.and_utc();
    let minutes = elapsed.num_minutes().max(0);

    if minutes < 60 {
        format!("{} min ago", minutes)
    } else if minutes < 60 * 24 {
        format!("{} hours ago", elapsed.num_hours())
    } else {
        format!("{} days ago", elapsed.num_days())
    }
}
