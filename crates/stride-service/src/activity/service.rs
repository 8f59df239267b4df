//! Activity recording service.
//!
//! Recording an activity folds its metrics into the caller's active
//! competition participations right away; leaderboards recompute from
//! the raw activities, so the denormalized totals only serve the
//! participants listing.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use stride_cache::{CacheManager, keys};
use stride_core::error::AppError;
use stride_core::traits::cache::CacheProvider;
use stride_database::{ActivityStore, CompetitionStore, ParticipantStore};
use stride_entity::activity::{Activity, ActivityKind, NewActivity};

use crate::context::RequestContext;

/// Request to record one activity for the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordActivityRequest {
    /// The kind of activity performed.
    pub kind: ActivityKind,
    /// Distance covered in kilometres.
    pub distance_km: f64,
    /// Moving time in seconds.
    pub duration_seconds: f64,
    /// Step count.
    pub steps: f64,
    /// Calories burned.
    pub calories: f64,
    /// When the activity took place; defaults to now.
    pub recorded_at: Option<DateTime<Utc>>,
}

/// Records activities and keeps participation progress in step.
#[derive(Debug, Clone)]
pub struct ActivityService {
    /// Activity records.
    activities: Arc<dyn ActivityStore>,
    /// Membership records, for progress updates.
    participants: Arc<dyn ParticipantStore>,
    /// Competition lookups, for window and kind checks.
    competitions: Arc<dyn CompetitionStore>,
    /// Leaderboard cache, invalidated on ingest.
    cache: Arc<CacheManager>,
}

impl ActivityService {
    /// Creates a new activity service.
    pub fn new(
        activities: Arc<dyn ActivityStore>,
        participants: Arc<dyn ParticipantStore>,
        competitions: Arc<dyn CompetitionStore>,
        cache: Arc<CacheManager>,
    ) -> Self {
        Self {
            activities,
            participants,
            competitions,
            cache,
        }
    }

    /// Record an activity for the caller and apply its qualifying metric
    /// to each active participation whose window contains it.
    pub async fn record(
        &self,
        ctx: &RequestContext,
        req: RecordActivityRequest,
    ) -> Result<Activity, AppError> {
        for (metric, value) in [
            ("distanceKm", req.distance_km),
            ("durationSeconds", req.duration_seconds),
            ("steps", req.steps),
            ("calories", req.calories),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AppError::validation(format!(
                    "{metric} must be a non-negative number"
                )));
            }
        }

        let activity = self
            .activities
            .insert(NewActivity {
                user_id: ctx.user_id,
                kind: req.kind,
                distance_km: req.distance_km,
                duration_seconds: req.duration_seconds,
                steps: req.steps,
                calories: req.calories,
                recorded_at: req.recorded_at.unwrap_or_else(Utc::now),
            })
            .await?;

        info!(
            activity_id = %activity.id,
            user_id = %ctx.user_id,
            kind = %activity.kind,
            "Activity recorded"
        );

        self.apply_to_participations(ctx.user_id, &activity).await?;
        Ok(activity)
    }

    async fn apply_to_participations(
        &self,
        user_id: Uuid,
        activity: &Activity,
    ) -> Result<(), AppError> {
        let participations = self.participants.active_for_user(user_id).await?;
        if participations.is_empty() {
            return Ok(());
        }

        let ids: Vec<Uuid> = participations.iter().map(|p| p.competition_id).collect();
        for competition in self.competitions.find_by_ids(&ids).await? {
            if !competition.window_contains(activity.recorded_at)
                || !competition.activity_kinds.contains(&activity.kind)
            {
                continue;
            }
            let delta = activity.metric(competition.kind);
            if delta <= 0.0 {
                continue;
            }

            self.participants
                .add_progress(competition.id, user_id, delta)
                .await?;
            if let Err(e) = self.cache.delete(&keys::leaderboard(competition.id)).await {
                warn!(
                    competition_id = %competition.id,
                    error = %e,
                    "Leaderboard cache invalidation failed"
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use stride_core::config::cache::CacheConfig;
    use stride_core::error::ErrorKind;
    use stride_database::memory::MemoryStore;
    use stride_entity::competition::{
        CompetitionKind, NewCompetition, Participant, ParticipantStatus,
    };

    async fn service_with_store() -> (ActivityService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let config: CacheConfig = serde_json::from_str("{}").unwrap();
        let cache = Arc::new(CacheManager::new(&config).await.unwrap());
        (
            ActivityService::new(store.clone(), store.clone(), store.clone(), cache),
            store,
        )
    }

    fn ctx() -> RequestContext {
        RequestContext::new(Uuid::new_v4(), "runner".into(), "127.0.0.1".into(), None)
    }

    fn run(distance_km: f64) -> RecordActivityRequest {
        RecordActivityRequest {
            kind: ActivityKind::Run,
            distance_km,
            duration_seconds: 1800.0,
            steps: 0.0,
            calories: 0.0,
            recorded_at: None,
        }
    }

    #[tokio::test]
    async fn test_record_rejects_negative_metrics() {
        let (service, _) = service_with_store().await;
        let err = service.record(&ctx(), run(-1.0)).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_record_updates_active_participation_progress() {
        let (service, store) = service_with_store().await;
        let ctx = ctx();
        let now = Utc::now();

        let competition = CompetitionStore::insert(
            store.as_ref(),
            NewCompetition {
                name: "Distance month".to_string(),
                description: String::new(),
                kind: CompetitionKind::Distance,
                goal: 100.0,
                activity_kinds: vec![ActivityKind::Run],
                starts_at: now - ChronoDuration::days(1),
                ends_at: now + ChronoDuration::days(1),
                is_private: false,
                created_by: ctx.user_id,
            },
        )
        .await
        .unwrap();

        let mut participant = Participant::invited(competition.id, ctx.user_id, now);
        participant.status = ParticipantStatus::Active;
        participant.joined_at = Some(now);
        ParticipantStore::insert(store.as_ref(), &participant)
            .await
            .unwrap();

        service.record(&ctx, run(12.5)).await.unwrap();

        let updated = store.find(competition.id, ctx.user_id).await.unwrap().unwrap();
        assert_eq!(updated.progress, 12.5);
    }

    #[tokio::test]
    async fn test_record_skips_ineligible_kind() {
        let (service, store) = service_with_store().await;
        let ctx = ctx();
        let now = Utc::now();

        let competition = CompetitionStore::insert(
            store.as_ref(),
            NewCompetition {
                name: "Swim sprint".to_string(),
                description: String::new(),
                kind: CompetitionKind::Distance,
                goal: 10.0,
                activity_kinds: vec![ActivityKind::Swim],
                starts_at: now - ChronoDuration::days(1),
                ends_at: now + ChronoDuration::days(1),
                is_private: false,
                created_by: ctx.user_id,
            },
        )
        .await
        .unwrap();

        let mut participant = Participant::invited(competition.id, ctx.user_id, now);
        participant.status = ParticipantStatus::Active;
        participant.joined_at = Some(now);
        ParticipantStore::insert(store.as_ref(), &participant)
            .await
            .unwrap();

        service.record(&ctx, run(12.5)).await.unwrap();

        let unchanged = store.find(competition.id, ctx.user_id).await.unwrap().unwrap();
        assert_eq!(unchanged.progress, 0.0);
    }
}
