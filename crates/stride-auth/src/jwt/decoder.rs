//! JWT token validation.

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

use stride_core::config::auth::AuthConfig;
use stride_core::error::AppError;

use super::claims::{Claims, TokenType};

/// Validates JWT access tokens.
#[derive(Clone)]
pub struct JwtDecoder {
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
}

impl std::fmt::Debug for JwtDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtDecoder {
    /// Creates a new decoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // 5 seconds leeway for clock skew

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Decodes and validates an access token string.
    ///
    /// Checks signature validity, expiration, and that the token type
    /// is `access`.
    pub fn decode_access_token(&self, token: &str) -> Result<Claims, AppError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::unauthorized("Token has expired")
                }
                _ => AppError::unauthorized("Invalid token"),
            })?
            .claims;

        if claims.token_type != TokenType::Access {
            return Err(AppError::unauthorized(
                "Refresh tokens cannot be used for API requests",
            ));
        }

        Ok(claims)
    }
}
