//! Shared result alias.

use crate::error::AppError;

/// `Result` specialized to [`AppError`], used across every Stride crate.
pub type AppResult<T> = Result<T, AppError>;
