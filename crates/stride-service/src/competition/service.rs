//! Competition lifecycle service.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use stride_cache::{CacheManager, keys};
use stride_core::error::AppError;
use stride_core::events::{NotificationEvent, NotificationKind};
use stride_core::traits::cache::CacheProvider;
use stride_core::types::pagination::{PageRequest, PageResponse};
use stride_database::{ActivityStore, CompetitionStore, ParticipantStore, UserStore};
use stride_entity::activity::ActivityKind;
use stride_entity::competition::{
    Competition, CompetitionKind, CompetitionPatch, CompetitionStatusFilter, NewCompetition,
    Participant, ParticipantStatus,
};
use stride_entity::user::UserProfile;
use stride_notify::Notifier;

use super::leaderboard::rank_participants;
use crate::context::RequestContext;

/// How long a computed leaderboard stays cached.
const LEADERBOARD_TTL: Duration = Duration::from_secs(30);

/// Request to create a new competition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompetitionRequest {
    /// Display name (3–100 chars).
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Scored metric.
    pub kind: CompetitionKind,
    /// Numeric target, at least 1.
    pub goal: f64,
    /// Eligible activity kinds; must not be empty.
    pub activity_kinds: Vec<ActivityKind>,
    /// Window start.
    pub starts_at: DateTime<Utc>,
    /// Window end; must be after the start.
    pub ends_at: DateTime<Utc>,
    /// Restrict visibility to creator and participants.
    pub is_private: bool,
    /// Users to invite at creation time.
    pub invited_users: Vec<Uuid>,
}

/// One leaderboard row with the participant's profile joined in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based position.
    pub rank: u32,
    /// The participant's profile.
    pub user: UserProfile,
    /// Aggregated progress in the competition's metric.
    pub progress: f64,
    /// Whether the goal has been reached.
    pub goal_met: bool,
}

/// One membership row with the participant's profile joined in.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantEntry {
    /// The member's profile.
    pub user: UserProfile,
    /// Membership status.
    pub status: ParticipantStatus,
    /// When the user was (last) invited.
    pub invited_at: DateTime<Utc>,
    /// When the user accepted, if they have.
    pub joined_at: Option<DateTime<Utc>>,
    /// Denormalized running progress.
    pub progress: f64,
}

/// Manages competitions, membership, and leaderboards.
#[derive(Debug, Clone)]
pub struct CompetitionService {
    /// User lookups.
    users: Arc<dyn UserStore>,
    /// Competition records.
    competitions: Arc<dyn CompetitionStore>,
    /// Membership records.
    participants: Arc<dyn ParticipantStore>,
    /// Activity aggregation for leaderboards.
    activities: Arc<dyn ActivityStore>,
    /// Leaderboard cache.
    cache: Arc<CacheManager>,
    /// Outbound notifications.
    notifier: Notifier,
}

impl CompetitionService {
    /// Creates a new competition service.
    pub fn new(
        users: Arc<dyn UserStore>,
        competitions: Arc<dyn CompetitionStore>,
        participants: Arc<dyn ParticipantStore>,
        activities: Arc<dyn ActivityStore>,
        cache: Arc<CacheManager>,
        notifier: Notifier,
    ) -> Self {
        Self {
            users,
            competitions,
            participants,
            activities,
            cache,
            notifier,
        }
    }

    /// Create a competition. The creator becomes an `active` participant;
    /// `invited_users` get `invited` rows and a notification each.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        req: CreateCompetitionRequest,
    ) -> Result<Competition, AppError> {
        validate_name(&req.name)?;
        validate_goal(req.goal)?;
        validate_window(req.starts_at, req.ends_at)?;
        validate_activity_kinds(&req.activity_kinds)?;

        let competition = self
            .competitions
            .insert(NewCompetition {
                name: req.name,
                description: req.description,
                kind: req.kind,
                goal: req.goal,
                activity_kinds: req.activity_kinds,
                starts_at: req.starts_at,
                ends_at: req.ends_at,
                is_private: req.is_private,
                created_by: ctx.user_id,
            })
            .await?;

        let now = Utc::now();
        let creator = Participant {
            status: ParticipantStatus::Active,
            joined_at: Some(now),
            ..Participant::invited(competition.id, ctx.user_id, now)
        };
        self.participants.insert(&creator).await?;

        info!(
            competition_id = %competition.id,
            created_by = %ctx.user_id,
            kind = %competition.kind,
            "Competition created"
        );

        self.invite_users(ctx, &competition, &req.invited_users)
            .await?;

        Ok(competition)
    }

    /// Apply a partial update. Creator only.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        patch: CompetitionPatch,
    ) -> Result<Competition, AppError> {
        let mut competition = self.visible_competition(ctx, id).await?;
        if competition.created_by != ctx.user_id {
            return Err(AppError::forbidden(
                "Only the creator can modify a competition",
            ));
        }
        if patch.is_empty() {
            return Ok(competition);
        }

        if let Some(name) = patch.name {
            validate_name(&name)?;
            competition.name = name;
        }
        if let Some(description) = patch.description {
            competition.description = description;
        }
        if let Some(goal) = patch.goal {
            validate_goal(goal)?;
            competition.goal = goal;
        }
        if let Some(kinds) = patch.activity_kinds {
            validate_activity_kinds(&kinds)?;
            competition.activity_kinds = kinds;
        }
        if let Some(starts_at) = patch.starts_at {
            competition.starts_at = starts_at;
        }
        if let Some(ends_at) = patch.ends_at {
            competition.ends_at = ends_at;
        }
        validate_window(competition.starts_at, competition.ends_at)?;
        if let Some(is_private) = patch.is_private {
            competition.is_private = is_private;
        }
        competition.updated_at = Utc::now();

        self.competitions.update(&competition).await?;
        self.invalidate_leaderboard(competition.id).await;
        info!(competition_id = %competition.id, "Competition updated");

        // Every current member except the caller hears about the change.
        let members = self.participants.member_user_ids(competition.id).await?;
        for user_id in members.into_iter().filter(|id| *id != ctx.user_id) {
            self.notifier.notify(NotificationEvent::new(
                user_id,
                NotificationKind::CompetitionUpdated,
                "Competition updated",
                format!("\"{}\" has been updated", competition.name),
                serde_json::json!({ "competitionId": competition.id }),
            ));
        }

        Ok(competition)
    }

    /// Invite users to a competition. Creator only. Unknown users and
    /// users who are already invited or active are skipped; `rejected`
    /// and `left` rows are reset to `invited`. Returns how many users
    /// were (re)invited.
    pub async fn invite(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        user_ids: &[Uuid],
    ) -> Result<u64, AppError> {
        let competition = self.visible_competition(ctx, id).await?;
        if competition.created_by != ctx.user_id {
            return Err(AppError::forbidden(
                "Only the creator can invite participants",
            ));
        }
        self.invite_users(ctx, &competition, user_ids).await
    }

    /// Accept a pending invite. The caller becomes `active`.
    pub async fn accept_invite(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        let competition = self.visible_competition(ctx, id).await?;
        self.invited_participant(ctx, id).await?;

        let now = Utc::now();
        self.participants
            .set_status(id, ctx.user_id, ParticipantStatus::Active, Some(now), None)
            .await?;
        self.invalidate_leaderboard(id).await;
        info!(competition_id = %id, user_id = %ctx.user_id, "Competition invite accepted");

        self.notifier.notify(NotificationEvent::new(
            competition.created_by,
            NotificationKind::CompetitionInviteAccepted,
            "Invite accepted",
            format!("{} joined \"{}\"", ctx.username, competition.name),
            serde_json::json!({ "competitionId": id, "userId": ctx.user_id }),
        ));
        Ok(())
    }

    /// Decline a pending invite. The row stays `rejected` until the
    /// creator re-invites.
    pub async fn reject_invite(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        self.visible_competition(ctx, id).await?;
        self.invited_participant(ctx, id).await?;

        self.participants
            .set_status(id, ctx.user_id, ParticipantStatus::Rejected, None, None)
            .await?;
        info!(competition_id = %id, user_id = %ctx.user_id, "Competition invite rejected");
        Ok(())
    }

    /// Withdraw from a competition the caller is active in.
    pub async fn leave(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        self.visible_competition(ctx, id).await?;
        self.participants
            .find(id, ctx.user_id)
            .await?
            .filter(|p| p.status == ParticipantStatus::Active)
            .ok_or_else(|| AppError::not_found("You are not participating in this competition"))?;

        self.participants
            .set_status(id, ctx.user_id, ParticipantStatus::Left, None, None)
            .await?;
        self.invalidate_leaderboard(id).await;
        info!(competition_id = %id, user_id = %ctx.user_id, "Left competition");
        Ok(())
    }

    /// Fetch one competition, applying visibility rules.
    pub async fn get(&self, ctx: &RequestContext, id: Uuid) -> Result<Competition, AppError> {
        self.visible_competition(ctx, id).await
    }

    /// Competitions visible to the caller, optionally filtered by derived
    /// status.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        status: Option<CompetitionStatusFilter>,
        page: PageRequest,
    ) -> Result<PageResponse<Competition>, AppError> {
        self.competitions
            .list_visible(ctx.user_id, status, Utc::now(), &page)
            .await
    }

    /// The competition's leaderboard: active participants ranked by
    /// aggregated progress, short-lived cache in front.
    pub async fn leaderboard(
        &self,
        ctx: &RequestContext,
        id: Uuid,
    ) -> Result<Vec<LeaderboardEntry>, AppError> {
        let competition = self.visible_competition(ctx, id).await?;

        let cache_key = keys::leaderboard(id);
        match self.cache.get_json::<Vec<LeaderboardEntry>>(&cache_key).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => warn!(competition_id = %id, error = %e, "Leaderboard cache read failed"),
        }

        let active = self.participants.list_active(id).await?;
        let user_ids: Vec<Uuid> = active.iter().map(|p| p.user_id).collect();
        let progress = self
            .activities
            .aggregate_progress(
                &user_ids,
                competition.kind,
                &competition.activity_kinds,
                competition.starts_at,
                competition.ends_at,
            )
            .await?;
        let profiles: std::collections::HashMap<Uuid, UserProfile> = self
            .users
            .profiles_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        let entries: Vec<LeaderboardEntry> =
            rank_participants(&active, &progress, competition.goal)
                .into_iter()
                .filter_map(|r| {
                    profiles.get(&r.user_id).cloned().map(|user| LeaderboardEntry {
                        rank: r.rank,
                        user,
                        progress: r.progress,
                        goal_met: r.goal_met,
                    })
                })
                .collect();

        if let Err(e) = self
            .cache
            .set_json(&cache_key, &entries, LEADERBOARD_TTL)
            .await
        {
            warn!(competition_id = %id, error = %e, "Leaderboard cache write failed");
        }

        Ok(entries)
    }

    /// All membership rows of a competition, with profiles joined in.
    pub async fn participants(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        page: PageRequest,
    ) -> Result<PageResponse<ParticipantEntry>, AppError> {
        self.visible_competition(ctx, id).await?;

        let rows = self.participants.list(id, &page).await?;
        let user_ids: Vec<Uuid> = rows.items.iter().map(|p| p.user_id).collect();
        let profiles: std::collections::HashMap<Uuid, UserProfile> = self
            .users
            .profiles_by_ids(&user_ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        Ok(rows.map(|p| ParticipantEntry {
            user: profiles.get(&p.user_id).cloned().unwrap_or_else(|| UserProfile {
                id: p.user_id,
                username: String::new(),
                display_name: None,
                level: 0,
            }),
            status: p.status,
            invited_at: p.invited_at,
            joined_at: p.joined_at,
            progress: p.progress,
        }))
    }

    /// Load a competition the caller is allowed to see.
    ///
    /// A private competition is indistinguishable from a missing one for
    /// outsiders: both return `NotFound`.
    async fn visible_competition(
        &self,
        ctx: &RequestContext,
        id: Uuid,
    ) -> Result<Competition, AppError> {
        let competition = self
            .competitions
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Competition not found"))?;

        if competition.is_private && competition.created_by != ctx.user_id {
            let is_member = self.participants.find(id, ctx.user_id).await?.is_some();
            if !is_member {
                return Err(AppError::not_found("Competition not found"));
            }
        }
        Ok(competition)
    }

    async fn invited_participant(
        &self,
        ctx: &RequestContext,
        competition_id: Uuid,
    ) -> Result<Participant, AppError> {
        self.participants
            .find(competition_id, ctx.user_id)
            .await?
            .filter(|p| p.status == ParticipantStatus::Invited)
            .ok_or_else(|| AppError::not_found("No pending invite for this competition"))
    }

    /// Shared invite fan-out used by `create` and `invite`.
    async fn invite_users(
        &self,
        ctx: &RequestContext,
        competition: &Competition,
        user_ids: &[Uuid],
    ) -> Result<u64, AppError> {
        let mut seen = HashSet::new();
        let mut invited = 0u64;
        let now = Utc::now();

        for &user_id in user_ids {
            if user_id == ctx.user_id || !seen.insert(user_id) {
                continue;
            }
            if self.users.find_by_id(user_id).await?.is_none() {
                continue;
            }
            match self.participants.find(competition.id, user_id).await? {
                None => {
                    self.participants
                        .insert(&Participant::invited(competition.id, user_id, now))
                        .await?;
                }
                Some(p) if p.status.can_reinvite() => {
                    self.participants
                        .set_status(
                            competition.id,
                            user_id,
                            ParticipantStatus::Invited,
                            None,
                            Some(now),
                        )
                        .await?;
                }
                // Already invited or active.
                Some(_) => continue,
            }

            invited += 1;
            self.notifier.notify(NotificationEvent::new(
                user_id,
                NotificationKind::CompetitionInvite,
                "Competition invite",
                format!("{} invited you to \"{}\"", ctx.username, competition.name),
                serde_json::json!({ "competitionId": competition.id, "invitedBy": ctx.user_id }),
            ));
        }

        if invited > 0 {
            info!(
                competition_id = %competition.id,
                invited,
                "Participants invited"
            );
        }
        Ok(invited)
    }

    async fn invalidate_leaderboard(&self, competition_id: Uuid) {
        if let Err(e) = self.cache.delete(&keys::leaderboard(competition_id)).await {
            warn!(
                competition_id = %competition_id,
                error = %e,
                "Leaderboard cache invalidation failed"
            );
        }
    }
}

/// Name must be 3–100 characters.
fn validate_name(name: &str) -> Result<(), AppError> {
    let len = name.chars().count();
    if !(3..=100).contains(&len) {
        return Err(AppError::validation(
            "Competition name must be between 3 and 100 characters",
        ));
    }
    Ok(())
}

fn validate_goal(goal: f64) -> Result<(), AppError> {
    if !goal.is_finite() || goal < 1.0 {
        return Err(AppError::validation("Goal must be at least 1"));
    }
    Ok(())
}

fn validate_window(starts_at: DateTime<Utc>, ends_at: DateTime<Utc>) -> Result<(), AppError> {
    if starts_at >= ends_at {
        return Err(AppError::validation("Start date must be before end date"));
    }
    Ok(())
}

fn validate_activity_kinds(kinds: &[ActivityKind]) -> Result<(), AppError> {
    if kinds.is_empty() {
        return Err(AppError::validation(
            "At least one activity kind is required",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use stride_core::config::cache::CacheConfig;
    use stride_core::error::ErrorKind;
    use stride_database::memory::MemoryStore;
    use stride_entity::activity::NewActivity;
    use stride_entity::user::User;
    use stride_notify::LogDispatcher;

    struct Fixture {
        service: CompetitionService,
        store: Arc<MemoryStore>,
        alice: RequestContext,
        bob: Uuid,
        carol: Uuid,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(MemoryStore::new());
        let mut ids = Vec::new();
        for name in ["alice", "bob", "carol"] {
            let user = User {
                id: Uuid::new_v4(),
                username: name.to_string(),
                display_name: None,
                email: None,
                level: 1,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };
            ids.push(user.id);
            store.seed_user(user).await;
        }

        // All CacheConfig fields default; the default provider is memory.
        let config: CacheConfig = serde_json::from_str("{}").unwrap();
        let cache = Arc::new(CacheManager::new(&config).await.unwrap());

        let service = CompetitionService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            cache,
            Notifier::from_dispatcher(Arc::new(LogDispatcher::new())),
        );
        Fixture {
            service,
            store,
            alice: RequestContext::new(ids[0], "alice".into(), "127.0.0.1".into(), None),
            bob: ids[1],
            carol: ids[2],
        }
    }

    fn ctx_for(user_id: Uuid, name: &str) -> RequestContext {
        RequestContext::new(user_id, name.into(), "127.0.0.1".into(), None)
    }

    fn request(invited: Vec<Uuid>) -> CreateCompetitionRequest {
        let now = Utc::now();
        CreateCompetitionRequest {
            name: "March distance challenge".to_string(),
            description: "Who covers the most ground?".to_string(),
            kind: CompetitionKind::Distance,
            goal: 100.0,
            activity_kinds: vec![ActivityKind::Run, ActivityKind::Walk],
            starts_at: now - ChronoDuration::days(1),
            ends_at: now + ChronoDuration::days(30),
            is_private: false,
            invited_users: invited,
        }
    }

    #[tokio::test]
    async fn test_create_validates_fields() {
        let fx = fixture().await;

        let mut bad = request(vec![]);
        bad.name = "ab".to_string();
        assert_eq!(
            fx.service.create(&fx.alice, bad).await.unwrap_err().kind,
            ErrorKind::Validation
        );

        let mut bad = request(vec![]);
        bad.goal = 0.5;
        assert_eq!(
            fx.service.create(&fx.alice, bad).await.unwrap_err().kind,
            ErrorKind::Validation
        );

        let mut bad = request(vec![]);
        bad.ends_at = bad.starts_at;
        assert_eq!(
            fx.service.create(&fx.alice, bad).await.unwrap_err().kind,
            ErrorKind::Validation
        );

        let mut bad = request(vec![]);
        bad.activity_kinds.clear();
        assert_eq!(
            fx.service.create(&fx.alice, bad).await.unwrap_err().kind,
            ErrorKind::Validation
        );
    }

    #[tokio::test]
    async fn test_create_makes_creator_active_and_invites_others() {
        let fx = fixture().await;
        let competition = fx
            .service
            .create(&fx.alice, request(vec![fx.bob, fx.bob, fx.alice.user_id]))
            .await
            .unwrap();

        let page = fx
            .service
            .participants(&fx.alice, competition.id, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(page.total_items, 2);

        let creator = page
            .items
            .iter()
            .find(|p| p.user.id == fx.alice.user_id)
            .unwrap();
        assert_eq!(creator.status, ParticipantStatus::Active);

        let invitee = page.items.iter().find(|p| p.user.id == fx.bob).unwrap();
        assert_eq!(invitee.status, ParticipantStatus::Invited);
    }

    #[tokio::test]
    async fn test_update_is_creator_only() {
        let fx = fixture().await;
        let competition = fx
            .service
            .create(&fx.alice, request(vec![fx.bob]))
            .await
            .unwrap();

        let bob_ctx = ctx_for(fx.bob, "bob");
        let err = fx
            .service
            .update(
                &bob_ctx,
                competition.id,
                CompetitionPatch {
                    name: Some("Hijacked".to_string()),
                    ..CompetitionPatch::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Forbidden);

        let updated = fx
            .service
            .update(
                &fx.alice,
                competition.id,
                CompetitionPatch {
                    goal: Some(200.0),
                    ..CompetitionPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.goal, 200.0);
    }

    #[tokio::test]
    async fn test_invite_accept_reject_leave_lifecycle() {
        let fx = fixture().await;
        let competition = fx
            .service
            .create(&fx.alice, request(vec![]))
            .await
            .unwrap();

        // Only the creator may invite.
        let bob_ctx = ctx_for(fx.bob, "bob");
        assert_eq!(
            fx.service
                .invite(&bob_ctx, competition.id, &[fx.carol])
                .await
                .unwrap_err()
                .kind,
            ErrorKind::Forbidden
        );

        let invited = fx
            .service
            .invite(&fx.alice, competition.id, &[fx.bob, fx.carol, Uuid::new_v4()])
            .await
            .unwrap();
        assert_eq!(invited, 2);

        // Re-inviting an invited user is a no-op.
        assert_eq!(
            fx.service
                .invite(&fx.alice, competition.id, &[fx.bob])
                .await
                .unwrap(),
            0
        );

        fx.service
            .accept_invite(&bob_ctx, competition.id)
            .await
            .unwrap();
        // No invite remains, so accepting again is NotFound.
        assert_eq!(
            fx.service
                .accept_invite(&bob_ctx, competition.id)
                .await
                .unwrap_err()
                .kind,
            ErrorKind::NotFound
        );

        let carol_ctx = ctx_for(fx.carol, "carol");
        fx.service
            .reject_invite(&carol_ctx, competition.id)
            .await
            .unwrap();
        // Rejected users need a fresh invite.
        assert_eq!(
            fx.service
                .accept_invite(&carol_ctx, competition.id)
                .await
                .unwrap_err()
                .kind,
            ErrorKind::NotFound
        );
        assert_eq!(
            fx.service
                .invite(&fx.alice, competition.id, &[fx.carol])
                .await
                .unwrap(),
            1
        );

        fx.service.leave(&bob_ctx, competition.id).await.unwrap();
        assert_eq!(
            fx.service
                .leave(&bob_ctx, competition.id)
                .await
                .unwrap_err()
                .kind,
            ErrorKind::NotFound
        );
    }

    #[tokio::test]
    async fn test_private_competition_hidden_from_outsiders() {
        let fx = fixture().await;
        let mut req = request(vec![fx.bob]);
        req.is_private = true;
        let competition = fx.service.create(&fx.alice, req).await.unwrap();

        // Carol has no row, so the competition does not exist for her.
        let carol_ctx = ctx_for(fx.carol, "carol");
        assert_eq!(
            fx.service
                .get(&carol_ctx, competition.id)
                .await
                .unwrap_err()
                .kind,
            ErrorKind::NotFound
        );

        // Invited Bob can see it.
        let bob_ctx = ctx_for(fx.bob, "bob");
        fx.service.get(&bob_ctx, competition.id).await.unwrap();

        // And it stays out of Carol's listing.
        let listing = fx
            .service
            .list(&carol_ctx, None, PageRequest::default())
            .await
            .unwrap();
        assert!(listing.items.iter().all(|c| c.id != competition.id));
    }

    #[tokio::test]
    async fn test_leaderboard_ranks_and_flags_goal() {
        let fx = fixture().await;
        let competition = fx
            .service
            .create(&fx.alice, request(vec![fx.bob]))
            .await
            .unwrap();
        let bob_ctx = ctx_for(fx.bob, "bob");
        fx.service
            .accept_invite(&bob_ctx, competition.id)
            .await
            .unwrap();

        // Bob runs past the goal; Alice walks a bit; Bob's ride does not
        // count because rides are not an eligible kind.
        for (user, kind, km) in [
            (fx.bob, ActivityKind::Run, 120.0),
            (fx.bob, ActivityKind::Ride, 500.0),
            (fx.alice.user_id, ActivityKind::Walk, 40.0),
        ] {
            ActivityStore::insert(
                fx.store.as_ref(),
                NewActivity {
                    user_id: user,
                    kind,
                    distance_km: km,
                    duration_seconds: 0.0,
                    steps: 0.0,
                    calories: 0.0,
                    recorded_at: Utc::now(),
                },
            )
            .await
            .unwrap();
        }

        let board = fx
            .service
            .leaderboard(&fx.alice, competition.id)
            .await
            .unwrap();
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].user.id, fx.bob);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[0].progress, 120.0);
        assert!(board[0].goal_met);
        assert_eq!(board[1].user.id, fx.alice.user_id);
        assert_eq!(board[1].progress, 40.0);
        assert!(!board[1].goal_met);
    }
}
