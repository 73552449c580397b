//! Router-level tests: the full API surface wired against an in-memory,
//! seeded database.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{Duration, NaiveDateTime, Utc};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use panel_api::auth::{AppState, AppStateInner, hash_password};
use panel_api::routes::router;
use panel_api::token::issue_token;
use panel_db::{Database, seed};
use panel_types::api::Claims;

const SECRET: &str = "test-secret";

fn test_app() -> Router {
    let db = Database::open_in_memory().unwrap();
    seed::run(&db, hash_password).unwrap();
    let state: AppState = Arc::new(AppStateInner {
        db,
        jwt_secret: SECRET.into(),
    });
    router(state)
}

fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn admin_token(app: &Router) -> String {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"username": "admin", "password": "admin123"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn admin_login_returns_token_for_seeded_credentials() {
    let app = test_app();
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"username": "admin", "password": "admin123"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["admin"]["username"], "admin");
}

#[tokio::test]
async fn admin_login_rejects_wrong_password() {
    let app = test_app();
    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({"username": "admin", "password": "wrong"})),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = test_app();
    for uri in [
        "/api/dashboard/stats",
        "/api/dashboard/activity",
        "/api/packages",
        "/api/users",
    ] {
        let (status, body) = send(&app, request("GET", uri, None, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["error"], "Authentication required", "{uri}");
    }
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let app = test_app();
    let stale = Claims {
        sub: 1,
        username: "admin".into(),
        kind: None,
        exp: (Utc::now() - Duration::hours(2)).timestamp() as usize,
    };
    let token = issue_token(SECRET, &stale).unwrap();

    let (status, body) = send(
        &app,
        request("GET", "/api/dashboard/stats", Some(&token), None),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Invalid or expired token");
}

#[tokio::test]
async fn package_crud_roundtrip() {
    let app = test_app();
    let token = admin_token(&app).await;

    let (status, created) = send(
        &app,
        request(
            "POST",
            "/api/packages",
            Some(&token),
            Some(json!({"name": "Family", "channels": 200, "duration": 30, "price": 12.5})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "active");
    assert_eq!(created["subscribers"], 0);
    let id = created["id"].as_i64().unwrap();

    let (status, listed) = send(&app, request("GET", "/api/packages", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 4); // 3 seeded + 1

    let (status, _) = send(
        &app,
        request(
            "PUT",
            &format!("/api/packages/{id}"),
            Some(&token),
            Some(json!({"name": "Family+", "channels": 250, "duration": 60, "price": 19.9, "status": "active"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, fetched) = send(
        &app,
        request("GET", &format!("/api/packages/{id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Family+");
    assert_eq!(fetched["duration"], 60);

    let (status, _) = send(
        &app,
        request("DELETE", &format!("/api/packages/{id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Deleting again affects zero rows.
    let (status, body) = send(
        &app,
        request("DELETE", &format!("/api/packages/{id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Package not found");
}

#[tokio::test]
async fn missing_package_lookup_is_404() {
    let app = test_app();
    let token = admin_token(&app).await;

    let (status, _) = send(
        &app,
        request("GET", "/api/packages/9999", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn packages_list_counts_active_subscribers() {
    let app = test_app();
    let token = admin_token(&app).await;

    // Seed: john_tv (active) + old_client (expired) on package 1,
    // maria_hd on 2, alex_stream on 3.
    let (status, listed) = send(&app, request("GET", "/api/packages", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    let counts: Vec<i64> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["subscribers"].as_i64().unwrap())
        .collect();
    assert_eq!(counts, vec![1, 1, 1]);
}

#[tokio::test]
async fn user_create_computes_expiry_from_package_duration() {
    let app = test_app();
    let token = admin_token(&app).await;

    // Seeded package 1 ("Basic") has a 30 day duration.
    let (status, created) = send(
        &app,
        request(
            "POST",
            "/api/users",
            Some(&token),
            Some(json!({
                "username": "fresh_user",
                "password": "secret",
                "package_id": 1,
                "device": "Android Box"
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "active");
    assert_eq!(created["package_name"], "Basic");

    let expiry =
        NaiveDateTime::parse_from_str(created["expiry_date"].as_str().unwrap(), "%Y-%m-%d %H:%M:%S")
            .unwrap()
            .and_utc();
    let expected = Utc::now() + Duration::days(30);
    assert!((expiry - expected).num_seconds().abs() < 300);
}

#[tokio::test]
async fn user_update_and_delete_signal_not_found() {
    let app = test_app();
    let token = admin_token(&app).await;

    let (status, _) = send(
        &app,
        request(
            "PUT",
            "/api/users/9999",
            Some(&token),
            Some(json!({"package_id": 1, "device": "MAG", "status": "expired"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, request("DELETE", "/api/users/9999", Some(&token), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn subscriber_login_stamps_last_seen() {
    let app = test_app();

    let (status, body) = send(
        &app,
        request(
            "POST",
            "/api/auth/user-login",
            None,
            Some(json!({"username": "john_tv", "password": "iptv123"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["user"]["username"], "john_tv");

    let token = admin_token(&app).await;
    let (_, activity) = send(
        &app,
        request("GET", "/api/dashboard/activity", Some(&token), None),
    )
    .await;
    let top = &activity.as_array().unwrap()[0];
    assert_eq!(top["username"], "john_tv");
    assert_eq!(top["lastSeen"], "0 min ago");
}

#[tokio::test]
async fn channel_lineup_is_public_but_mutations_are_not() {
    let app = test_app();
    let token = admin_token(&app).await;

    let (status, created) = send(
        &app,
        request(
            "POST",
            "/api/channels",
            Some(&token),
            Some(json!({
                "name": "News 24",
                "url": "http://stream.example.com/news",
                "category": "News",
                "package_id": 1
            })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let channel_id = created["id"].as_i64().unwrap();

    // Lineup fetch needs no token (player apps).
    let (status, lineup) = send(&app, request("GET", "/api/channels/1", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(lineup.as_array().unwrap().len(), 1);
    assert_eq!(lineup[0]["name"], "News 24");

    // Mutations stay guarded.
    let (status, _) = send(&app, request("POST", "/api/channels", None, Some(json!({"name": "X"})))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(
        &app,
        request("DELETE", &format!("/api/channels/{channel_id}"), None, None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        request("DELETE", &format!("/api/channels/{channel_id}"), Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn dashboard_stats_reflect_the_seeded_fixture() {
    let app = test_app();
    let token = admin_token(&app).await;

    let (status, stats) = send(
        &app,
        request("GET", "/api/dashboard/stats", Some(&token), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalRevenue"], 0.0);
    assert_eq!(stats["todayRevenue"], 0.0);
    assert_eq!(stats["activeUsers"], 3);
    assert_eq!(stats["newUsersThisWeek"], 4);
    assert_eq!(stats["totalChannels"], 0);
    assert_eq!(stats["totalPackages"], 3);
}
