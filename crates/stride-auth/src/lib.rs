//! # stride-auth
//!
//! Token handling for the Stride social backend. Identity lives in a
//! separate service; this crate only validates the HS256 bearer tokens
//! that service issues, and can mint equivalent tokens for tests and
//! local development.

pub mod jwt;

pub use jwt::claims::{Claims, TokenType};
pub use jwt::decoder::JwtDecoder;
pub use jwt::encoder::JwtEncoder;
