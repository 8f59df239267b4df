//! Integration tests for the competition endpoints.

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::helpers::TestApp;

fn competition_body(name: &str, goal: f64) -> Value {
    let now = Utc::now();
    json!({
        "name": name,
        "description": "distance over a week",
        "kind": "distance",
        "goal": goal,
        "activityKinds": ["run"],
        "startsAt": now - Duration::hours(1),
        "endsAt": now + Duration::hours(24),
        "isPrivate": false,
    })
}

async fn create_competition(app: &TestApp, token: &str, body: Value) -> Value {
    app.request("POST", "/competitions", Some(body), Some(token))
        .await
        .expect_success(StatusCode::CREATED)["competition"]
        .clone()
}

#[tokio::test]
async fn create_validates_input() {
    let app = TestApp::new().await;
    let alice = app.seed_user("alice").await;
    let token = app.token_for(alice, "alice");

    // Name too short
    let mut body = competition_body("ab", 100.0);
    let response = app
        .request("POST", "/competitions", Some(body), Some(&token))
        .await;
    response.expect_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR");

    // Goal below 1
    body = competition_body("Spring sprint", 0.5);
    let response = app
        .request("POST", "/competitions", Some(body), Some(&token))
        .await;
    response.expect_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR");

    // Window inverted
    body = competition_body("Spring sprint", 100.0);
    body["startsAt"] = json!(Utc::now() + Duration::hours(48));
    let response = app
        .request("POST", "/competitions", Some(body), Some(&token))
        .await;
    response.expect_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}

#[tokio::test]
async fn creator_becomes_active_participant() {
    let app = TestApp::new().await;
    let alice = app.seed_user("alice").await;
    let token = app.token_for(alice, "alice");

    let competition = create_competition(&app, &token, competition_body("Spring sprint", 100.0)).await;
    let id = competition["id"].as_str().unwrap().to_string();
    assert_eq!(competition["createdBy"], json!(alice));

    let participants = app
        .request(
            "GET",
            &format!("/competitions/{id}/participants"),
            None,
            Some(&token),
        )
        .await
        .expect_success(StatusCode::OK);
    assert_eq!(participants["total"], 1);
    assert_eq!(participants["participants"][0]["status"], "active");
    assert_eq!(participants["participants"][0]["user"]["username"], "alice");
}

#[tokio::test]
async fn private_competition_is_hidden_from_outsiders() {
    let app = TestApp::new().await;
    let alice = app.seed_user("alice").await;
    let bob = app.seed_user("bob").await;
    let alice_token = app.token_for(alice, "alice");
    let bob_token = app.token_for(bob, "bob");

    let mut body = competition_body("Secret club", 100.0);
    body["isPrivate"] = json!(true);
    let competition = create_competition(&app, &alice_token, body).await;
    let id = competition["id"].as_str().unwrap().to_string();

    // Hidden resources read as absent, not forbidden.
    let response = app
        .request("GET", &format!("/competitions/{id}"), None, Some(&bob_token))
        .await;
    response.expect_error(StatusCode::NOT_FOUND, "NOT_FOUND");

    let response = app
        .request(
            "GET",
            &format!("/competitions/{id}/leaderboard"),
            None,
            Some(&bob_token),
        )
        .await;
    response.expect_error(StatusCode::NOT_FOUND, "NOT_FOUND");

    let listing = app
        .request("GET", "/competitions", None, Some(&bob_token))
        .await
        .expect_success(StatusCode::OK);
    assert_eq!(listing["total"], 0);

    // The creator still sees it.
    app.request("GET", &format!("/competitions/{id}"), None, Some(&alice_token))
        .await
        .expect_success(StatusCode::OK);
}

#[tokio::test]
async fn only_the_creator_can_update() {
    let app = TestApp::new().await;
    let alice = app.seed_user("alice").await;
    let bob = app.seed_user("bob").await;
    let alice_token = app.token_for(alice, "alice");
    let bob_token = app.token_for(bob, "bob");

    let competition = create_competition(&app, &alice_token, competition_body("Spring sprint", 100.0)).await;
    let id = competition["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            "PUT",
            &format!("/competitions/{id}"),
            Some(json!({ "name": "Hijacked" })),
            Some(&bob_token),
        )
        .await;
    response.expect_error(StatusCode::FORBIDDEN, "FORBIDDEN");

    let updated = app
        .request(
            "PUT",
            &format!("/competitions/{id}"),
            Some(json!({ "name": "Summer sprint" })),
            Some(&alice_token),
        )
        .await
        .expect_success(StatusCode::OK);
    assert_eq!(updated["competition"]["name"], "Summer sprint");
}

#[tokio::test]
async fn invite_accept_reject_leave_lifecycle() {
    let app = TestApp::new().await;
    let alice = app.seed_user("alice").await;
    let bob = app.seed_user("bob").await;
    let carol = app.seed_user("carol").await;
    let alice_token = app.token_for(alice, "alice");
    let bob_token = app.token_for(bob, "bob");
    let carol_token = app.token_for(carol, "carol");

    let competition = create_competition(&app, &alice_token, competition_body("Spring sprint", 100.0)).await;
    let id = competition["id"].as_str().unwrap().to_string();

    // Only the creator can invite.
    let response = app
        .request(
            "POST",
            &format!("/competitions/{id}/invite"),
            Some(json!({ "userIds": [carol] })),
            Some(&bob_token),
        )
        .await;
    response.expect_error(StatusCode::FORBIDDEN, "FORBIDDEN");

    // Unknown users and the creator are skipped silently.
    let invited = app
        .request(
            "POST",
            &format!("/competitions/{id}/invite"),
            Some(json!({ "userIds": [bob, carol, alice, Uuid::new_v4()] })),
            Some(&alice_token),
        )
        .await
        .expect_success(StatusCode::OK);
    assert_eq!(invited["invited"], 2);

    // Re-inviting a pending user does nothing.
    let invited = app
        .request(
            "POST",
            &format!("/competitions/{id}/invite"),
            Some(json!({ "userIds": [bob] })),
            Some(&alice_token),
        )
        .await
        .expect_success(StatusCode::OK);
    assert_eq!(invited["invited"], 0);

    app.request(
        "POST",
        &format!("/competitions/{id}/accept"),
        None,
        Some(&bob_token),
    )
    .await
    .expect_success(StatusCode::OK);

    // No pending invite left to accept.
    let response = app
        .request(
            "POST",
            &format!("/competitions/{id}/accept"),
            None,
            Some(&bob_token),
        )
        .await;
    response.expect_error(StatusCode::NOT_FOUND, "NOT_FOUND");

    app.request(
        "POST",
        &format!("/competitions/{id}/reject"),
        None,
        Some(&carol_token),
    )
    .await
    .expect_success(StatusCode::OK);

    // A rejected user can be re-invited.
    let invited = app
        .request(
            "POST",
            &format!("/competitions/{id}/invite"),
            Some(json!({ "userIds": [carol] })),
            Some(&alice_token),
        )
        .await
        .expect_success(StatusCode::OK);
    assert_eq!(invited["invited"], 1);

    app.request(
        "POST",
        &format!("/competitions/{id}/leave"),
        None,
        Some(&bob_token),
    )
    .await
    .expect_success(StatusCode::OK);

    // Leaving twice is a 404.
    let response = app
        .request(
            "POST",
            &format!("/competitions/{id}/leave"),
            None,
            Some(&bob_token),
        )
        .await;
    response.expect_error(StatusCode::NOT_FOUND, "NOT_FOUND");
}

#[tokio::test]
async fn status_filter_selects_by_window() {
    let app = TestApp::new().await;
    let alice = app.seed_user("alice").await;
    let token = app.token_for(alice, "alice");
    let now = Utc::now();

    let mut upcoming = competition_body("Next month", 100.0);
    upcoming["startsAt"] = json!(now + Duration::days(20));
    upcoming["endsAt"] = json!(now + Duration::days(27));
    create_competition(&app, &token, upcoming).await;

    create_competition(&app, &token, competition_body("Right now", 100.0)).await;

    let mut ended = competition_body("Last month", 100.0);
    ended["startsAt"] = json!(now - Duration::days(27));
    ended["endsAt"] = json!(now - Duration::days(20));
    create_competition(&app, &token, ended).await;

    for (filter, name) in [
        ("upcoming", "Next month"),
        ("active", "Right now"),
        ("ended", "Last month"),
    ] {
        let listing = app
            .request(
                "GET",
                &format!("/competitions?status={filter}"),
                None,
                Some(&token),
            )
            .await
            .expect_success(StatusCode::OK);
        assert_eq!(listing["total"], 1, "filter {filter}");
        assert_eq!(listing["competitions"][0]["name"], name);
    }

    let all = app
        .request("GET", "/competitions", None, Some(&token))
        .await
        .expect_success(StatusCode::OK);
    assert_eq!(all["total"], 3);
}

#[tokio::test]
async fn leaderboard_ranks_by_progress_with_join_time_tie_break() {
    let app = TestApp::new().await;
    let alice = app.seed_user("alice").await;
    let bob = app.seed_user("bob").await;
    let carol = app.seed_user("carol").await;
    let dave = app.seed_user("dave").await;
    let alice_token = app.token_for(alice, "alice");
    let bob_token = app.token_for(bob, "bob");
    let carol_token = app.token_for(carol, "carol");
    let dave_token = app.token_for(dave, "dave");

    let competition = create_competition(&app, &alice_token, competition_body("Spring sprint", 60.0)).await;
    let id = competition["id"].as_str().unwrap().to_string();

    app.request(
        "POST",
        &format!("/competitions/{id}/invite"),
        Some(json!({ "userIds": [bob, carol, dave] })),
        Some(&alice_token),
    )
    .await
    .expect_success(StatusCode::OK);

    // Bob joins before carol; the tie at 80 resolves in his favor.
    for token in [&bob_token, &carol_token, &dave_token] {
        app.request(
            "POST",
            &format!("/competitions/{id}/accept"),
            None,
            Some(token),
        )
        .await
        .expect_success(StatusCode::OK);
    }

    for (token, distance) in [
        (&alice_token, 50.0),
        (&bob_token, 80.0),
        (&carol_token, 80.0),
        (&dave_token, 30.0),
    ] {
        app.request(
            "POST",
            "/activities",
            Some(json!({ "kind": "run", "distanceKm": distance })),
            Some(token),
        )
        .await
        .expect_success(StatusCode::CREATED);
    }

    // A ride does not count toward a run-only competition.
    app.request(
        "POST",
        "/activities",
        Some(json!({ "kind": "ride", "distanceKm": 500.0 })),
        Some(&dave_token),
    )
    .await
    .expect_success(StatusCode::CREATED);

    let body = app
        .request(
            "GET",
            &format!("/competitions/{id}/leaderboard"),
            None,
            Some(&alice_token),
        )
        .await
        .expect_success(StatusCode::OK);

    let leaderboard = body["leaderboard"].as_array().unwrap();
    assert_eq!(leaderboard.len(), 4);

    let summary: Vec<(u64, &str, f64, bool)> = leaderboard
        .iter()
        .map(|e| {
            (
                e["rank"].as_u64().unwrap(),
                e["user"]["username"].as_str().unwrap(),
                e["progress"].as_f64().unwrap(),
                e["goalMet"].as_bool().unwrap(),
            )
        })
        .collect();

    assert_eq!(
        summary,
        vec![
            (1, "bob", 80.0, true),
            (2, "carol", 80.0, true),
            (3, "alice", 50.0, false),
            (4, "dave", 30.0, false),
        ]
    );
}
