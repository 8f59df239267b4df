//! Route definitions for the Stride HTTP API.
//!
//! All routes are organized by domain. The router receives `AppState`
//! and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .merge(friend_routes())
        .merge(competition_routes())
        .merge(activity_routes())
        .merge(health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::timeout::request_timeout,
        ))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::rate_limit,
        ))
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Friendship endpoints: lists, requests, suggestions, relationship status.
fn friend_routes() -> Router<AppState> {
    Router::new()
        .route("/friends", get(handlers::friend::list_friends))
        .route("/friends/requests", get(handlers::friend::list_requests))
        .route("/friends/request", post(handlers::friend::send_request))
        .route("/friends/accept", post(handlers::friend::accept_request))
        .route("/friends/reject", post(handlers::friend::reject_request))
        .route(
            "/friends/{friendId}",
            delete(handlers::friend::remove_friend),
        )
        .route("/friends/suggestions", get(handlers::friend::suggestions))
        .route(
            "/friends/common/{userId}",
            get(handlers::friend::common_friends),
        )
        .route(
            "/friends/status/{userId}",
            get(handlers::friend::relationship_status),
        )
}

/// Competition lifecycle, membership, and leaderboard endpoints.
fn competition_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/competitions",
            get(handlers::competition::list_competitions),
        )
        .route(
            "/competitions",
            post(handlers::competition::create_competition),
        )
        .route(
            "/competitions/{id}",
            get(handlers::competition::get_competition),
        )
        .route(
            "/competitions/{id}",
            put(handlers::competition::update_competition),
        )
        .route(
            "/competitions/{id}/invite",
            post(handlers::competition::invite),
        )
        .route(
            "/competitions/{id}/accept",
            post(handlers::competition::accept_invite),
        )
        .route(
            "/competitions/{id}/reject",
            post(handlers::competition::reject_invite),
        )
        .route("/competitions/{id}/leave", post(handlers::competition::leave))
        .route(
            "/competitions/{id}/leaderboard",
            get(handlers::competition::leaderboard),
        )
        .route(
            "/competitions/{id}/participants",
            get(handlers::competition::participants),
        )
}

/// Activity ingest endpoint.
fn activity_routes() -> Router<AppState> {
    Router::new().route("/activities", post(handlers::activity::record_activity))
}

/// Unauthenticated health probe.
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
