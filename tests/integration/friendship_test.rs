//! Integration tests for the friendship endpoints.

use axum::http::StatusCode;
use serde_json::json;

use crate::helpers::TestApp;

#[tokio::test]
async fn requires_bearer_token() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/friends", None, None).await;

    response.expect_error(StatusCode::UNAUTHORIZED, "UNAUTHORIZED");
}

#[tokio::test]
async fn send_request_creates_pending_friendship() {
    let app = TestApp::new().await;
    let alice = app.seed_user("alice").await;
    let bob = app.seed_user("bob").await;
    let token = app.token_for(alice, "alice");

    let response = app
        .request(
            "POST",
            "/friends/request",
            Some(json!({ "targetUserId": bob })),
            Some(&token),
        )
        .await;

    let body = response.expect_success(StatusCode::CREATED);
    assert!(body["friendshipId"].is_string());

    // Bob sees the incoming request
    let bob_token = app.token_for(bob, "bob");
    let requests = app
        .request("GET", "/friends/requests", None, Some(&bob_token))
        .await
        .expect_success(StatusCode::OK);
    assert_eq!(requests["total"], 1);
    assert_eq!(requests["requests"][0]["from"]["username"], "alice");
}

#[tokio::test]
async fn self_request_is_rejected() {
    let app = TestApp::new().await;
    let alice = app.seed_user("alice").await;
    let token = app.token_for(alice, "alice");

    let response = app
        .request(
            "POST",
            "/friends/request",
            Some(json!({ "targetUserId": alice })),
            Some(&token),
        )
        .await;

    response.expect_error(StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
}

#[tokio::test]
async fn request_to_unknown_user_is_not_found() {
    let app = TestApp::new().await;
    let alice = app.seed_user("alice").await;
    let token = app.token_for(alice, "alice");

    let response = app
        .request(
            "POST",
            "/friends/request",
            Some(json!({ "targetUserId": uuid::Uuid::new_v4() })),
            Some(&token),
        )
        .await;

    response.expect_error(StatusCode::NOT_FOUND, "NOT_FOUND");
}

#[tokio::test]
async fn duplicate_request_is_a_conflict() {
    let app = TestApp::new().await;
    let alice = app.seed_user("alice").await;
    let bob = app.seed_user("bob").await;
    let token = app.token_for(alice, "alice");

    app.request(
        "POST",
        "/friends/request",
        Some(json!({ "targetUserId": bob })),
        Some(&token),
    )
    .await
    .expect_success(StatusCode::CREATED);

    let response = app
        .request(
            "POST",
            "/friends/request",
            Some(json!({ "targetUserId": bob })),
            Some(&token),
        )
        .await;

    response.expect_error(StatusCode::BAD_REQUEST, "CONFLICT");
}

#[tokio::test]
async fn mutual_requests_collapse_into_acceptance() {
    let app = TestApp::new().await;
    let alice = app.seed_user("alice").await;
    let bob = app.seed_user("bob").await;
    let alice_token = app.token_for(alice, "alice");
    let bob_token = app.token_for(bob, "bob");

    app.request(
        "POST",
        "/friends/request",
        Some(json!({ "targetUserId": bob })),
        Some(&alice_token),
    )
    .await
    .expect_success(StatusCode::CREATED);

    // Bob's mirror request accepts the existing record instead of
    // creating a second one.
    app.request(
        "POST",
        "/friends/request",
        Some(json!({ "targetUserId": alice })),
        Some(&bob_token),
    )
    .await
    .expect_success(StatusCode::CREATED);

    for (token, friend) in [(&alice_token, "bob"), (&bob_token, "alice")] {
        let friends = app
            .request("GET", "/friends", None, Some(token))
            .await
            .expect_success(StatusCode::OK);
        assert_eq!(friends["total"], 1);
        assert_eq!(friends["friends"][0]["user"]["username"], friend);
    }
}

#[tokio::test]
async fn accept_flow_creates_friendship_both_ways() {
    let app = TestApp::new().await;
    let alice = app.seed_user("alice").await;
    let bob = app.seed_user("bob").await;
    let alice_token = app.token_for(alice, "alice");
    let bob_token = app.token_for(bob, "bob");

    let created = app
        .request(
            "POST",
            "/friends/request",
            Some(json!({ "targetUserId": bob })),
            Some(&alice_token),
        )
        .await
        .expect_success(StatusCode::CREATED);
    let request_id = created["friendshipId"].clone();

    let accepted = app
        .request(
            "POST",
            "/friends/accept",
            Some(json!({ "requestId": request_id })),
            Some(&bob_token),
        )
        .await
        .expect_success(StatusCode::OK);
    assert_eq!(accepted["friend"]["username"], "alice");
    assert_eq!(accepted["friendship"]["status"], "accepted");

    let friends = app
        .request("GET", "/friends", None, Some(&alice_token))
        .await
        .expect_success(StatusCode::OK);
    assert_eq!(friends["friends"][0]["user"]["username"], "bob");
}

#[tokio::test]
async fn only_the_receiver_can_accept() {
    let app = TestApp::new().await;
    let alice = app.seed_user("alice").await;
    let bob = app.seed_user("bob").await;
    let alice_token = app.token_for(alice, "alice");

    let created = app
        .request(
            "POST",
            "/friends/request",
            Some(json!({ "targetUserId": bob })),
            Some(&alice_token),
        )
        .await
        .expect_success(StatusCode::CREATED);

    // The sender cannot accept their own request.
    let response = app
        .request(
            "POST",
            "/friends/accept",
            Some(json!({ "requestId": created["friendshipId"] })),
            Some(&alice_token),
        )
        .await;

    response.expect_error(StatusCode::NOT_FOUND, "NOT_FOUND");
}

#[tokio::test]
async fn rejected_sender_may_ask_again() {
    let app = TestApp::new().await;
    let alice = app.seed_user("alice").await;
    let bob = app.seed_user("bob").await;
    let alice_token = app.token_for(alice, "alice");
    let bob_token = app.token_for(bob, "bob");

    let created = app
        .request(
            "POST",
            "/friends/request",
            Some(json!({ "targetUserId": bob })),
            Some(&alice_token),
        )
        .await
        .expect_success(StatusCode::CREATED);

    app.request(
        "POST",
        "/friends/reject",
        Some(json!({ "requestId": created["friendshipId"] })),
        Some(&bob_token),
    )
    .await
    .expect_success(StatusCode::OK);

    // The record is gone, so a fresh request succeeds.
    app.request(
        "POST",
        "/friends/request",
        Some(json!({ "targetUserId": bob })),
        Some(&alice_token),
    )
    .await
    .expect_success(StatusCode::CREATED);
}

#[tokio::test]
async fn remove_friend_deletes_the_pair() {
    let app = TestApp::new().await;
    let alice = app.seed_user("alice").await;
    let bob = app.seed_user("bob").await;
    let alice_token = app.token_for(alice, "alice");
    let bob_token = app.token_for(bob, "bob");

    let created = app
        .request(
            "POST",
            "/friends/request",
            Some(json!({ "targetUserId": bob })),
            Some(&alice_token),
        )
        .await
        .expect_success(StatusCode::CREATED);
    app.request(
        "POST",
        "/friends/accept",
        Some(json!({ "requestId": created["friendshipId"] })),
        Some(&bob_token),
    )
    .await
    .expect_success(StatusCode::OK);

    app.request(
        "DELETE",
        &format!("/friends/{bob}"),
        None,
        Some(&alice_token),
    )
    .await
    .expect_success(StatusCode::OK);

    let friends = app
        .request("GET", "/friends", None, Some(&bob_token))
        .await
        .expect_success(StatusCode::OK);
    assert_eq!(friends["total"], 0);

    // Removing again is a 404.
    let response = app
        .request(
            "DELETE",
            &format!("/friends/{bob}"),
            None,
            Some(&alice_token),
        )
        .await;
    response.expect_error(StatusCode::NOT_FOUND, "NOT_FOUND");
}

#[tokio::test]
async fn status_reflects_request_direction() {
    let app = TestApp::new().await;
    let alice = app.seed_user("alice").await;
    let bob = app.seed_user("bob").await;
    let alice_token = app.token_for(alice, "alice");
    let bob_token = app.token_for(bob, "bob");

    let none = app
        .request("GET", &format!("/friends/status/{bob}"), None, Some(&alice_token))
        .await
        .expect_success(StatusCode::OK);
    assert_eq!(none["status"], "none");

    app.request(
        "POST",
        "/friends/request",
        Some(json!({ "targetUserId": bob })),
        Some(&alice_token),
    )
    .await
    .expect_success(StatusCode::CREATED);

    let sent = app
        .request("GET", &format!("/friends/status/{bob}"), None, Some(&alice_token))
        .await
        .expect_success(StatusCode::OK);
    assert_eq!(sent["status"], "pending_sent");

    let received = app
        .request("GET", &format!("/friends/status/{alice}"), None, Some(&bob_token))
        .await
        .expect_success(StatusCode::OK);
    assert_eq!(received["status"], "pending_received");
    assert!(received["requestId"].is_string());
}

#[tokio::test]
async fn suggestions_exclude_related_users_and_match_query() {
    let app = TestApp::new().await;
    let alice = app.seed_user("alice").await;
    let bob = app.seed_user("bob").await;
    app.seed_user_with_level("carol", 5).await;
    app.seed_user_with_level("caroline", 2).await;
    let alice_token = app.token_for(alice, "alice");

    app.request(
        "POST",
        "/friends/request",
        Some(json!({ "targetUserId": bob })),
        Some(&alice_token),
    )
    .await
    .expect_success(StatusCode::CREATED);

    // Bob (pending) and alice herself are excluded; carol outranks
    // caroline on level.
    let body = app
        .request("GET", "/friends/suggestions", None, Some(&alice_token))
        .await
        .expect_success(StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["users"][0]["username"], "carol");
    assert_eq!(body["users"][1]["username"], "caroline");

    let filtered = app
        .request(
            "GET",
            "/friends/suggestions?query=caroline",
            None,
            Some(&alice_token),
        )
        .await
        .expect_success(StatusCode::OK);
    assert_eq!(filtered["total"], 1);
    assert_eq!(filtered["users"][0]["username"], "caroline");
}

#[tokio::test]
async fn common_friends_lists_the_intersection() {
    let app = TestApp::new().await;
    let alice = app.seed_user("alice").await;
    let bob = app.seed_user("bob").await;
    let carol = app.seed_user("carol").await;
    let alice_token = app.token_for(alice, "alice");
    let bob_token = app.token_for(bob, "bob");
    let carol_token = app.token_for(carol, "carol");

    // Carol befriends both alice and bob.
    for (target, their_token) in [(alice, &alice_token), (bob, &bob_token)] {
        let created = app
            .request(
                "POST",
                "/friends/request",
                Some(json!({ "targetUserId": target })),
                Some(&carol_token),
            )
            .await
            .expect_success(StatusCode::CREATED);
        app.request(
            "POST",
            "/friends/accept",
            Some(json!({ "requestId": created["friendshipId"] })),
            Some(their_token),
        )
        .await
        .expect_success(StatusCode::OK);
    }

    let body = app
        .request(
            "GET",
            &format!("/friends/common/{bob}"),
            None,
            Some(&alice_token),
        )
        .await
        .expect_success(StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["friends"][0]["username"], "carol");
}
