//! Application builder — wires stores, services, and middleware into an Axum app.

use std::sync::Arc;

use axum::Router;

use stride_auth::jwt::decoder::JwtDecoder;
use stride_cache::provider::CacheManager;
use stride_cache::rate_limit::RateLimiter;
use stride_core::config::AppConfig;
use stride_core::error::AppError;
use stride_database::memory::MemoryStore;
use stride_database::repositories::{
    ActivityRepository, CompetitionRepository, FriendshipRepository, ParticipantRepository,
    UserRepository,
};
use stride_database::stores::{
    ActivityStore, CompetitionStore, FriendshipStore, ParticipantStore, UserStore,
};
use stride_notify::Notifier;
use stride_service::activity::ActivityService;
use stride_service::competition::CompetitionService;
use stride_service::friendship::FriendshipService;

use crate::router::build_router;
use crate::state::AppState;

/// The five store handles the services are built over.
///
/// Either Postgres repositories or a shared [`MemoryStore`], depending on
/// `database.backend`.
#[derive(Clone)]
pub struct Stores {
    /// User lookups.
    pub users: Arc<dyn UserStore>,
    /// Friendship records.
    pub friendships: Arc<dyn FriendshipStore>,
    /// Competition records.
    pub competitions: Arc<dyn CompetitionStore>,
    /// Membership records.
    pub participants: Arc<dyn ParticipantStore>,
    /// Activity records.
    pub activities: Arc<dyn ActivityStore>,
}

impl Stores {
    /// Stores backed by one shared in-memory state.
    pub fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            friendships: store.clone(),
            competitions: store.clone(),
            participants: store.clone(),
            activities: store,
        }
    }
}

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    build_router(state)
}

/// Builds the application state from explicit stores.
///
/// Used directly by integration tests that seed an in-memory store.
pub fn build_state_with(
    config: AppConfig,
    stores: Stores,
    cache: Arc<CacheManager>,
    notifier: Notifier,
) -> AppState {
    let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));
    let rate_limiter = Arc::new(RateLimiter::new(&config.rate_limit));

    let friendship_service = Arc::new(FriendshipService::new(
        Arc::clone(&stores.users),
        Arc::clone(&stores.friendships),
        notifier.clone(),
    ));
    let competition_service = Arc::new(CompetitionService::new(
        Arc::clone(&stores.users),
        Arc::clone(&stores.competitions),
        Arc::clone(&stores.participants),
        Arc::clone(&stores.activities),
        Arc::clone(&cache),
        notifier.clone(),
    ));
    let activity_service = Arc::new(ActivityService::new(
        Arc::clone(&stores.activities),
        Arc::clone(&stores.participants),
        Arc::clone(&stores.competitions),
        Arc::clone(&cache),
    ));

    AppState {
        config: Arc::new(config),
        cache,
        jwt_decoder,
        rate_limiter,
        friendship_service,
        competition_service,
        activity_service,
    }
}

/// Builds the application state from configuration alone.
///
/// Selects the store backend, connects the cache, and wires all services.
pub async fn build_state(config: AppConfig) -> Result<AppState, AppError> {
    let stores = match config.database.backend.as_str() {
        "memory" => {
            tracing::info!("Using in-memory store backend");
            Stores::in_memory(Arc::new(MemoryStore::new()))
        }
        "postgres" => {
            tracing::info!("Connecting to database...");
            let pool = stride_database::connection::create_pool(&config.database).await?;

            tracing::info!("Running database migrations...");
            stride_database::migration::run_migrations(&pool).await?;
            tracing::info!("Database migrations complete");

            Stores {
                users: Arc::new(UserRepository::new(pool.clone())),
                friendships: Arc::new(FriendshipRepository::new(pool.clone())),
                competitions: Arc::new(CompetitionRepository::new(pool.clone())),
                participants: Arc::new(ParticipantRepository::new(pool.clone())),
                activities: Arc::new(ActivityRepository::new(pool)),
            }
        }
        other => {
            return Err(AppError::configuration(format!(
                "Unknown database backend: {other}"
            )));
        }
    };

    tracing::info!(
        "Initializing cache (provider: {})...",
        config.cache.provider
    );
    let cache = Arc::new(CacheManager::new(&config.cache).await?);

    let notifier = Notifier::new(&config.notify)?;

    Ok(build_state_with(config, stores, cache, notifier))
}

/// Runs the Stride server until a shutdown signal arrives.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    let host = config.server.host.clone();
    let port = config.server.port;

    let state = build_state(config).await?;
    let app = build_app(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Stride server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Stride server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
