//! Per-identity rate limiting middleware.
//!
//! Buckets are keyed by user ID when the bearer token decodes, falling back
//! to the client IP for anonymous or invalid requests.

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use stride_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Consumes one token for the caller's identity before the handler runs.
pub async fn rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = identity_key(&state, request.headers());

    if !state.rate_limiter.check(&identity) {
        tracing::warn!(identity = %identity, "Rate limit exceeded");
        return Err(AppError::rate_limited("Too many requests").into());
    }

    Ok(next.run(request).await)
}

/// User ID when a valid bearer token is present, client IP otherwise.
fn identity_key(state: &AppState, headers: &HeaderMap) -> String {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    if let Some(token) = token
        && let Ok(claims) = state.jwt_decoder.decode_access_token(token)
    {
        return format!("user:{}", claims.user_id());
    }

    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");
    format!("ip:{ip}")
}
