//! Competition repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use stride_core::error::{AppError, ErrorKind};
use stride_core::result::AppResult;
use stride_core::types::pagination::{PageRequest, PageResponse};
use stride_entity::competition::{
    Competition, CompetitionStatusFilter, NewCompetition,
};

use crate::stores::CompetitionStore;

/// Repository for competition records.
#[derive(Debug, Clone)]
pub struct CompetitionRepository {
    pool: PgPool,
}

impl CompetitionRepository {
    /// Create a new competition repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Visibility clause shared by the count and page queries: public
/// competitions plus private ones the user created or was invited to.
const VISIBLE: &str = "(c.is_private = FALSE OR c.created_by = $1 OR EXISTS \
    (SELECT 1 FROM participants p WHERE p.competition_id = c.id AND p.user_id = $1))";

/// SQL fragment for a derived status filter, evaluated against `$2` (now).
/// Every branch references `$2` so the bind list stays fixed.
fn status_clause(status: Option<CompetitionStatusFilter>) -> &'static str {
    match status {
        None => "$2::timestamptz IS NOT NULL",
        Some(CompetitionStatusFilter::Upcoming) => "c.starts_at > $2",
        Some(CompetitionStatusFilter::Active) => "c.starts_at <= $2 AND c.ends_at >= $2",
        Some(CompetitionStatusFilter::Ended) => "c.ends_at < $2",
    }
}

#[async_trait]
impl CompetitionStore for CompetitionRepository {
    async fn insert(&self, new: NewCompetition) -> AppResult<Competition> {
        sqlx::query_as::<_, Competition>(
            "INSERT INTO competitions \
             (id, name, description, kind, goal, activity_kinds, starts_at, ends_at, \
              is_private, created_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, NOW(), NOW()) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.kind)
        .bind(new.goal)
        .bind(&new.activity_kinds)
        .bind(new.starts_at)
        .bind(new.ends_at)
        .bind(new.is_private)
        .bind(new.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert competition", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Competition>> {
        sqlx::query_as::<_, Competition>("SELECT * FROM competitions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find competition", e)
            })
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Competition>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, Competition>("SELECT * FROM competitions WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to load competitions", e)
            })
    }

    async fn update(&self, competition: &Competition) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE competitions SET name = $2, description = $3, goal = $4, \
             activity_kinds = $5, starts_at = $6, ends_at = $7, is_private = $8, \
             updated_at = $9 WHERE id = $1",
        )
        .bind(competition.id)
        .bind(&competition.name)
        .bind(&competition.description)
        .bind(competition.goal)
        .bind(&competition.activity_kinds)
        .bind(competition.starts_at)
        .bind(competition.ends_at)
        .bind(competition.is_private)
        .bind(competition.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update competition", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Competition not found"));
        }
        Ok(())
    }

    async fn list_visible(
        &self,
        user_id: Uuid,
        status: Option<CompetitionStatusFilter>,
        now: DateTime<Utc>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Competition>> {
        let filter = status_clause(status);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM competitions c WHERE {VISIBLE} AND {filter}"
        ))
        .bind(user_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count competitions", e)
        })?;

        let rows = sqlx::query_as::<_, Competition>(&format!(
            "SELECT c.* FROM competitions c WHERE {VISIBLE} AND {filter} \
             ORDER BY c.starts_at DESC LIMIT $3 OFFSET $4"
        ))
        .bind(user_id)
        .bind(now)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list competitions", e)
        })?;

        Ok(PageResponse::new(rows, page.page, page.page_size, total as u64))
    }
}
