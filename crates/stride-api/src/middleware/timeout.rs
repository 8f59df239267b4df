//! Request-scoped deadline middleware.

use std::time::Duration;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use stride_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Aborts requests that outlive `server.request_timeout_seconds`.
pub async fn request_timeout(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let deadline = Duration::from_secs(state.config.server.request_timeout_seconds);

    match tokio::time::timeout(deadline, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(
                timeout_seconds = state.config.server.request_timeout_seconds,
                "Request deadline expired"
            );
            ApiError::from(AppError::timeout("Request timed out")).into_response()
        }
    }
}
