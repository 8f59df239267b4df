//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and credential configuration.
///
/// Stride only verifies bearer tokens; minting happens in the identity
/// service. The encoder exists for tests and local development.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT verification (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Access token TTL in minutes (used by the test/dev encoder).
    #[serde(default = "default_access_ttl")]
    pub jwt_access_ttl_minutes: u64,
}

fn default_jwt_secret() -> String {
    "CHANGE_ME_IN_PRODUCTION".to_string()
}

fn default_access_ttl() -> u64 {
    15
}
