//! Embedded schema migrations.

use sqlx::PgPool;
use tracing::info;

use stride_core::error::{AppError, ErrorKind};

/// Applies any migrations not yet recorded in `_sqlx_migrations`.
///
/// Runs at startup before the first repository query. Safe to call on an
/// up-to-date schema.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    let migrator = sqlx::migrate!("../../migrations");

    info!(count = migrator.iter().count(), "Applying schema migrations");

    migrator.run(pool).await.map_err(|e| {
        AppError::with_source(ErrorKind::Database, format!("Migration failed: {e}"), e)
    })?;

    info!("Schema is up to date");
    Ok(())
}
