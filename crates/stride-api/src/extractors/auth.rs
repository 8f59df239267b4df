//! Bearer-token authentication extractor.
//!
//! Every protected handler takes an [`AuthUser`]; the extractor rejects the
//! request with 401 before the handler body runs when the token is missing,
//! malformed, or expired.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use stride_core::error::AppError;
use stride_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// The verified caller, carrying the request context built from JWT claims.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = state.jwt_decoder.decode_access_token(token)?;

        let ip_address = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        let user_agent = parts
            .headers
            .get("user-agent")
            .and_then(|v| v.to_str().ok())
            .map(String::from);

        Ok(AuthUser(RequestContext::new(
            claims.user_id(),
            claims.username,
            ip_address,
            user_agent,
        )))
    }
}

/// The token portion of an `Authorization: Bearer <token>` header.
fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

    header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::unauthorized("Invalid Authorization header format"))
}
