//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use stride_auth::jwt::decoder::JwtDecoder;
use stride_cache::provider::CacheManager;
use stride_cache::rate_limit::RateLimiter;
use stride_core::config::AppConfig;
use stride_service::activity::ActivityService;
use stride_service::competition::CompetitionService;
use stride_service::friendship::FriendshipService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Cache manager (Redis or in-memory)
    pub cache: Arc<CacheManager>,
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Per-identity token bucket rate limiter
    pub rate_limiter: Arc<RateLimiter>,
    /// Friendship state machine service
    pub friendship_service: Arc<FriendshipService>,
    /// Competition lifecycle and leaderboard service
    pub competition_service: Arc<CompetitionService>,
    /// Activity ingest service
    pub activity_service: Arc<ActivityService>,
}
