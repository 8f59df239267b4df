//! Friendship repository implementation.
//!
//! Uniqueness of the unordered user pair is enforced by a unique index on
//! `(LEAST(sender_id, receiver_id), GREATEST(sender_id, receiver_id))`, so
//! two concurrent mutual requests cannot both insert.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use stride_core::error::{AppError, ErrorKind};
use stride_core::result::AppResult;
use stride_core::types::pagination::{PageRequest, PageResponse};
use stride_entity::friendship::Friendship;

use crate::stores::FriendshipStore;

/// Repository for friendship records.
#[derive(Debug, Clone)]
pub struct FriendshipRepository {
    pool: PgPool,
}

impl FriendshipRepository {
    /// Create a new friendship repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FriendshipStore for FriendshipRepository {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Friendship>> {
        sqlx::query_as::<_, Friendship>("SELECT * FROM friendships WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find friendship", e))
    }

    async fn find_pair(&self, a: Uuid, b: Uuid) -> AppResult<Option<Friendship>> {
        sqlx::query_as::<_, Friendship>(
            "SELECT * FROM friendships \
             WHERE (sender_id = $1 AND receiver_id = $2) \
             OR (sender_id = $2 AND receiver_id = $1)",
        )
        .bind(a)
        .bind(b)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find pair record", e))
    }

    async fn insert_pending(&self, sender_id: Uuid, receiver_id: Uuid) -> AppResult<Friendship> {
        sqlx::query_as::<_, Friendship>(
            "INSERT INTO friendships (id, sender_id, receiver_id, status, created_at, updated_at) \
             VALUES ($1, $2, $3, 'pending', NOW(), NOW()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(sender_id)
        .bind(receiver_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error().is_some_and(|d| d.is_unique_violation()) {
                AppError::conflict("A relationship already exists between these users")
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to insert friend request", e)
            }
        })
    }

    async fn set_accepted(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<Friendship> {
        sqlx::query_as::<_, Friendship>(
            "UPDATE friendships SET status = 'accepted', updated_at = $2 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to accept friendship", e))?
        .ok_or_else(|| AppError::not_found("Friend request not found"))
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM friendships WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete friendship", e)
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Friendship not found"));
        }
        Ok(())
    }

    async fn list_accepted(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Friendship>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM friendships \
             WHERE status = 'accepted' AND (sender_id = $1 OR receiver_id = $1)",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count friends", e))?;

        let rows = sqlx::query_as::<_, Friendship>(
            "SELECT * FROM friendships \
             WHERE status = 'accepted' AND (sender_id = $1 OR receiver_id = $1) \
             ORDER BY updated_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list friends", e))?;

        Ok(PageResponse::new(rows, page.page, page.page_size, total as u64))
    }

    async fn list_incoming_pending(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Friendship>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM friendships WHERE status = 'pending' AND receiver_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count requests", e))?;

        let rows = sqlx::query_as::<_, Friendship>(
            "SELECT * FROM friendships WHERE status = 'pending' AND receiver_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list requests", e))?;

        Ok(PageResponse::new(rows, page.page, page.page_size, total as u64))
    }

    async fn friend_ids(&self, user_id: Uuid) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT CASE WHEN sender_id = $1 THEN receiver_id ELSE sender_id END \
             FROM friendships \
             WHERE status = 'accepted' AND (sender_id = $1 OR receiver_id = $1)",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load friend ids", e))
    }

    async fn related_user_ids(&self, user_id: Uuid) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT CASE WHEN sender_id = $1 THEN receiver_id ELSE sender_id END \
             FROM friendships WHERE sender_id = $1 OR receiver_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load related ids", e))
    }
}
