//! Activity repository implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use stride_core::error::{AppError, ErrorKind};
use stride_core::result::AppResult;
use stride_entity::activity::{Activity, ActivityKind, NewActivity};
use stride_entity::competition::CompetitionKind;

use crate::stores::ActivityStore;

/// Repository for recorded activities.
#[derive(Debug, Clone)]
pub struct ActivityRepository {
    pool: PgPool,
}

impl ActivityRepository {
    /// Create a new activity repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Column holding the metric a competition kind scores on.
fn metric_column(kind: CompetitionKind) -> &'static str {
    match kind {
        CompetitionKind::Distance => "distance_km",
        CompetitionKind::Duration => "duration_seconds",
        CompetitionKind::Steps => "steps",
        CompetitionKind::Calories => "calories",
    }
}

#[async_trait]
impl ActivityStore for ActivityRepository {
    async fn insert(&self, new: NewActivity) -> AppResult<Activity> {
        sqlx::query_as::<_, Activity>(
            "INSERT INTO activities \
             (id, user_id, kind, distance_km, duration_seconds, steps, calories, recorded_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(new.user_id)
        .bind(new.kind)
        .bind(new.distance_km)
        .bind(new.duration_seconds)
        .bind(new.steps)
        .bind(new.calories)
        .bind(new.recorded_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert activity", e))
    }

    async fn aggregate_progress(
        &self,
        user_ids: &[Uuid],
        kind: CompetitionKind,
        activity_kinds: &[ActivityKind],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<HashMap<Uuid, f64>> {
        if user_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let column = metric_column(kind);
        let rows = sqlx::query_as::<_, (Uuid, f64)>(&format!(
            "SELECT user_id, SUM({column}) FROM activities \
             WHERE user_id = ANY($1) AND kind = ANY($2) \
             AND recorded_at >= $3 AND recorded_at <= $4 \
             GROUP BY user_id"
        ))
        .bind(user_ids)
        .bind(activity_kinds)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to aggregate progress", e)
        })?;

        Ok(rows.into_iter().collect())
    }
}
