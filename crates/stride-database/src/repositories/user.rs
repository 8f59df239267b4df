//! User repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use stride_core::error::{AppError, ErrorKind};
use stride_core::result::AppResult;
use stride_core::types::pagination::{PageRequest, PageResponse};
use stride_entity::user::{User, UserProfile};

use crate::stores::UserStore;

/// Repository for user lookups and suggestion queries.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))
    }

    async fn profiles_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<UserProfile>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, UserProfile>(
            "SELECT id, username, display_name, level FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load user profiles", e))
    }

    async fn suggestion_candidates(
        &self,
        exclude: &[Uuid],
        query: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<UserProfile>> {
        let pattern = query.map(|q| format!("%{q}%"));

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM users \
             WHERE id <> ALL($1) \
             AND ($2::text IS NULL OR username ILIKE $2 OR display_name ILIKE $2 OR email ILIKE $2)",
        )
        .bind(exclude)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count candidates", e))?;

        let profiles = sqlx::query_as::<_, UserProfile>(
            "SELECT id, username, display_name, level FROM users \
             WHERE id <> ALL($1) \
             AND ($2::text IS NULL OR username ILIKE $2 OR display_name ILIKE $2 OR email ILIKE $2) \
             ORDER BY level DESC, username ASC LIMIT $3 OFFSET $4",
        )
        .bind(exclude)
        .bind(&pattern)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list candidates", e))?;

        Ok(PageResponse::new(
            profiles,
            page.page,
            page.page_size,
            total as u64,
        ))
    }
}
