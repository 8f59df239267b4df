//! Integration tests for activity ingest and rate limiting.

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;

use crate::helpers::{TestApp, config_with};

#[tokio::test]
async fn record_activity_returns_the_record() {
    let app = TestApp::new().await;
    let alice = app.seed_user("alice").await;
    let token = app.token_for(alice, "alice");

    let body = app
        .request(
            "POST",
            "/activities",
            Some(json!({
                "kind": "run",
                "distanceKm": 12.5,
                "durationSeconds": 3600.0,
            })),
            Some(&token),
        )
        .await
        .expect_success(StatusCode::CREATED);

    assert_eq!(body["activity"]["kind"], "run");
    assert_eq!(body["activity"]["distanceKm"], 12.5);
    assert_eq!(body["activity"]["userId"], json!(alice));
    assert!(body["activity"]["recordedAt"].is_string());
}

#[tokio::test]
async fn negative_metrics_are_rejected() {
    let app = TestApp::new().await;
    let alice = app.seed_user("alice").await;
    let token = app.token_for(alice, "alice");

    let response = app
        .request(
            "POST",
            "/activities",
            Some(json!({ "kind": "run", "distanceKm": -3.0 })),
            Some(&token),
        )
        .await;

    response.expect_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}

#[tokio::test]
async fn activity_outside_the_window_does_not_count() {
    let app = TestApp::new().await;
    let alice = app.seed_user("alice").await;
    let token = app.token_for(alice, "alice");
    let now = Utc::now();

    let created = app
        .request(
            "POST",
            "/competitions",
            Some(json!({
                "name": "Spring sprint",
                "description": "",
                "kind": "distance",
                "goal": 100.0,
                "activityKinds": ["run"],
                "startsAt": now - Duration::hours(1),
                "endsAt": now + Duration::hours(24),
            })),
            Some(&token),
        )
        .await
        .expect_success(StatusCode::CREATED);
    let id = created["competition"]["id"].as_str().unwrap().to_string();

    // Backdated before the window opened.
    app.request(
        "POST",
        "/activities",
        Some(json!({
            "kind": "run",
            "distanceKm": 40.0,
            "recordedAt": now - Duration::hours(3),
        })),
        Some(&token),
    )
    .await
    .expect_success(StatusCode::CREATED);

    let body = app
        .request(
            "GET",
            &format!("/competitions/{id}/leaderboard"),
            None,
            Some(&token),
        )
        .await
        .expect_success(StatusCode::OK);

    assert_eq!(body["leaderboard"][0]["progress"], 0.0);
}

#[tokio::test]
async fn rate_limit_kicks_in_after_burst() {
    let config = config_with(json!({
        "server": {},
        "database": { "backend": "memory", "url": "" },
        "cache": {},
        "auth": { "jwt_secret": "integration-test-secret", "jwt_access_ttl_minutes": 60 },
        "rate_limit": { "enabled": true, "max_tokens": 3, "refill_per_second": 0.001 },
        "notify": {},
        "logging": {},
    }));
    let app = TestApp::with_config(config).await;
    let alice = app.seed_user("alice").await;
    let token = app.token_for(alice, "alice");

    for _ in 0..3 {
        app.request("GET", "/friends", None, Some(&token))
            .await
            .expect_success(StatusCode::OK);
    }

    let response = app.request("GET", "/friends", None, Some(&token)).await;
    response.expect_error(StatusCode::TOO_MANY_REQUESTS, "RATE_LIMITED");
}
