//! Participant repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use stride_core::error::{AppError, ErrorKind};
use stride_core::result::AppResult;
use stride_core::types::pagination::{PageRequest, PageResponse};
use stride_entity::competition::{Participant, ParticipantStatus};

use crate::stores::ParticipantStore;

/// Repository for competition membership records.
#[derive(Debug, Clone)]
pub struct ParticipantRepository {
    pool: PgPool,
}

impl ParticipantRepository {
    /// Create a new participant repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ParticipantStore for ParticipantRepository {
    async fn find(&self, competition_id: Uuid, user_id: Uuid) -> AppResult<Option<Participant>> {
        sqlx::query_as::<_, Participant>(
            "SELECT * FROM participants WHERE competition_id = $1 AND user_id = $2",
        )
        .bind(competition_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find participant", e))
    }

    async fn insert(&self, participant: &Participant) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO participants \
             (competition_id, user_id, status, invited_at, joined_at, progress) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(participant.competition_id)
        .bind(participant.user_id)
        .bind(participant.status)
        .bind(participant.invited_at)
        .bind(participant.joined_at)
        .bind(participant.progress)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error().is_some_and(|d| d.is_unique_violation()) {
                AppError::conflict("User is already part of this competition")
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to insert participant", e)
            }
        })?;
        Ok(())
    }

    async fn set_status(
        &self,
        competition_id: Uuid,
        user_id: Uuid,
        status: ParticipantStatus,
        joined_at: Option<DateTime<Utc>>,
        invited_at: Option<DateTime<Utc>>,
    ) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE participants SET status = $3, \
             joined_at = COALESCE($4, joined_at), \
             invited_at = COALESCE($5, invited_at) \
             WHERE competition_id = $1 AND user_id = $2",
        )
        .bind(competition_id)
        .bind(user_id)
        .bind(status)
        .bind(joined_at)
        .bind(invited_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update participant", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Participant not found"));
        }
        Ok(())
    }

    async fn list(
        &self,
        competition_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Participant>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM participants WHERE competition_id = $1")
                .bind(competition_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count participants", e)
                })?;

        let rows = sqlx::query_as::<_, Participant>(
            "SELECT * FROM participants WHERE competition_id = $1 \
             ORDER BY invited_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(competition_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list participants", e)
        })?;

        Ok(PageResponse::new(rows, page.page, page.page_size, total as u64))
    }

    async fn list_active(&self, competition_id: Uuid) -> AppResult<Vec<Participant>> {
        sqlx::query_as::<_, Participant>(
            "SELECT * FROM participants WHERE competition_id = $1 AND status = 'active'",
        )
        .bind(competition_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list active participants", e)
        })
    }

    async fn member_user_ids(&self, competition_id: Uuid) -> AppResult<Vec<Uuid>> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM participants \
             WHERE competition_id = $1 AND status IN ('invited', 'active')",
        )
        .bind(competition_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to load member ids", e))
    }

    async fn active_for_user(&self, user_id: Uuid) -> AppResult<Vec<Participant>> {
        sqlx::query_as::<_, Participant>(
            "SELECT * FROM participants WHERE user_id = $1 AND status = 'active'",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to load participations", e)
        })
    }

    async fn add_progress(&self, competition_id: Uuid, user_id: Uuid, delta: f64) -> AppResult<()> {
        sqlx::query(
            "UPDATE participants SET progress = progress + $3 \
             WHERE competition_id = $1 AND user_id = $2",
        )
        .bind(competition_id)
        .bind(user_id)
        .bind(delta)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to add progress", e))?;
        Ok(())
    }
}
