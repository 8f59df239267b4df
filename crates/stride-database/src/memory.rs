//! In-memory store implementation.
//!
//! Backs the `memory` database backend and the integration tests. All five
//! store traits are implemented over a single `RwLock`-guarded state so
//! check-then-insert sequences inside one call are atomic, matching the
//! uniqueness guarantees the PostgreSQL schema provides through indexes.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use stride_core::error::AppError;
use stride_core::result::AppResult;
use stride_core::types::pagination::{PageRequest, PageResponse};
use stride_entity::activity::{Activity, ActivityKind, NewActivity};
use stride_entity::competition::{
    Competition, CompetitionKind, CompetitionStatusFilter, NewCompetition, Participant,
    ParticipantStatus,
};
use stride_entity::friendship::{Friendship, FriendshipStatus, PairKey};
use stride_entity::user::{User, UserProfile};

use crate::stores::{ActivityStore, CompetitionStore, FriendshipStore, ParticipantStore, UserStore};

#[derive(Debug, Default)]
struct State {
    users: HashMap<Uuid, User>,
    friendships: HashMap<Uuid, Friendship>,
    competitions: HashMap<Uuid, Competition>,
    participants: HashMap<(Uuid, Uuid), Participant>,
    activities: Vec<Activity>,
}

/// An in-memory implementation of every store trait.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user record directly. Test seeding helper.
    pub async fn seed_user(&self, user: User) {
        self.state.write().await.users.insert(user.id, user);
    }
}

/// Slice a fully materialized result set into one page.
fn paginate<T: Clone + serde::Serialize>(items: &[T], page: &PageRequest) -> PageResponse<T> {
    let total = items.len() as u64;
    let start = (page.offset() as usize).min(items.len());
    let end = (start + page.limit() as usize).min(items.len());
    PageResponse::new(items[start..end].to_vec(), page.page, page.page_size, total)
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn profiles_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<UserProfile>> {
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.users.get(id).map(User::profile))
            .collect())
    }

    async fn suggestion_candidates(
        &self,
        exclude: &[Uuid],
        query: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<UserProfile>> {
        let state = self.state.read().await;
        let mut candidates: Vec<&User> = state
            .users
            .values()
            .filter(|u| !exclude.contains(&u.id))
            .filter(|u| query.is_none_or(|q| u.matches_query(q)))
            .collect();
        candidates.sort_by(|a, b| {
            b.level
                .cmp(&a.level)
                .then_with(|| a.username.cmp(&b.username))
        });
        let profiles: Vec<UserProfile> = candidates.iter().map(|u| u.profile()).collect();
        Ok(paginate(&profiles, page))
    }
}

#[async_trait]
impl FriendshipStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Friendship>> {
        Ok(self.state.read().await.friendships.get(&id).cloned())
    }

    async fn find_pair(&self, a: Uuid, b: Uuid) -> AppResult<Option<Friendship>> {
        let key = PairKey::new(a, b)?;
        let state = self.state.read().await;
        Ok(state
            .friendships
            .values()
            .find(|f| f.pair_key() == key)
            .cloned())
    }

    async fn insert_pending(&self, sender_id: Uuid, receiver_id: Uuid) -> AppResult<Friendship> {
        let key = PairKey::new(sender_id, receiver_id)?;
        let mut state = self.state.write().await;
        // Pair check and insert happen under one write lock.
        if state.friendships.values().any(|f| f.pair_key() == key) {
            return Err(AppError::conflict(
                "A relationship already exists between these users",
            ));
        }
        let now = Utc::now();
        let friendship = Friendship {
            id: Uuid::new_v4(),
            sender_id,
            receiver_id,
            status: FriendshipStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        state.friendships.insert(friendship.id, friendship.clone());
        Ok(friendship)
    }

    async fn set_accepted(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<Friendship> {
        let mut state = self.state.write().await;
        let friendship = state
            .friendships
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found("Friend request not found"))?;
        friendship.status = FriendshipStatus::Accepted;
        friendship.updated_at = now;
        Ok(friendship.clone())
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.state
            .write()
            .await
            .friendships
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::not_found("Friendship not found"))
    }

    async fn list_accepted(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Friendship>> {
        let state = self.state.read().await;
        let mut rows: Vec<Friendship> = state
            .friendships
            .values()
            .filter(|f| f.status == FriendshipStatus::Accepted && f.involves(user_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(paginate(&rows, page))
    }

    async fn list_incoming_pending(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Friendship>> {
        let state = self.state.read().await;
        let mut rows: Vec<Friendship> = state
            .friendships
            .values()
            .filter(|f| f.status == FriendshipStatus::Pending && f.receiver_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(&rows, page))
    }

    async fn friend_ids(&self, user_id: Uuid) -> AppResult<Vec<Uuid>> {
        let state = self.state.read().await;
        Ok(state
            .friendships
            .values()
            .filter(|f| f.status == FriendshipStatus::Accepted && f.involves(user_id))
            .map(|f| f.counterpart(user_id))
            .collect())
    }

    async fn related_user_ids(&self, user_id: Uuid) -> AppResult<Vec<Uuid>> {
        let state = self.state.read().await;
        Ok(state
            .friendships
            .values()
            .filter(|f| f.involves(user_id))
            .map(|f| f.counterpart(user_id))
            .collect())
    }
}

#[async_trait]
impl CompetitionStore for MemoryStore {
    async fn insert(&self, new: NewCompetition) -> AppResult<Competition> {
        let now = Utc::now();
        let competition = Competition {
            id: Uuid::new_v4(),
            name: new.name,
            description: new.description,
            kind: new.kind,
            goal: new.goal,
            activity_kinds: new.activity_kinds,
            starts_at: new.starts_at,
            ends_at: new.ends_at,
            is_private: new.is_private,
            created_by: new.created_by,
            created_at: now,
            updated_at: now,
        };
        self.state
            .write()
            .await
            .competitions
            .insert(competition.id, competition.clone());
        Ok(competition)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Competition>> {
        Ok(self.state.read().await.competitions.get(&id).cloned())
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Competition>> {
        let state = self.state.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| state.competitions.get(id).cloned())
            .collect())
    }

    async fn update(&self, competition: &Competition) -> AppResult<()> {
        let mut state = self.state.write().await;
        match state.competitions.get_mut(&competition.id) {
            Some(existing) => {
                *existing = competition.clone();
                Ok(())
            }
            None => Err(AppError::not_found("Competition not found")),
        }
    }

    async fn list_visible(
        &self,
        user_id: Uuid,
        status: Option<CompetitionStatusFilter>,
        now: DateTime<Utc>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Competition>> {
        let state = self.state.read().await;
        let mut rows: Vec<Competition> = state
            .competitions
            .values()
            .filter(|c| {
                !c.is_private
                    || c.created_by == user_id
                    || state.participants.contains_key(&(c.id, user_id))
            })
            .filter(|c| status.is_none_or(|s| c.status_at(now) == s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.starts_at.cmp(&a.starts_at));
        Ok(paginate(&rows, page))
    }
}

#[async_trait]
impl ParticipantStore for MemoryStore {
    async fn find(&self, competition_id: Uuid, user_id: Uuid) -> AppResult<Option<Participant>> {
        Ok(self
            .state
            .read()
            .await
            .participants
            .get(&(competition_id, user_id))
            .cloned())
    }

    async fn insert(&self, participant: &Participant) -> AppResult<()> {
        let key = (participant.competition_id, participant.user_id);
        let mut state = self.state.write().await;
        if state.participants.contains_key(&key) {
            return Err(AppError::conflict("User is already part of this competition"));
        }
        state.participants.insert(key, participant.clone());
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
        let mut state = self.state.write().await;
        let participant = state
            .participants
            .get_mut(&(competition_id, user_id))
            .ok_or_else(|| AppError::not_found("Participant not found"))?;
        participant.status = status;
        if joined_at.is_some() {
            participant.joined_at = joined_at;
        }
        if let Some(at) = invited_at {
            participant.invited_at = at;
        }
        Ok(())
    }

    async fn list(
        &self,
        competition_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Participant>> {
        let state = self.state.read().await;
        let mut rows: Vec<Participant> = state
            .participants
            .values()
            .filter(|p| p.competition_id == competition_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.invited_at.cmp(&a.invited_at));
        Ok(paginate(&rows, page))
    }

    async fn list_active(&self, competition_id: Uuid) -> AppResult<Vec<Participant>> {
        let state = self.state.read().await;
        Ok(state
            .participants
            .values()
            .filter(|p| {
                p.competition_id == competition_id && p.status == ParticipantStatus::Active
            })
            .cloned()
            .collect())
    }

    async fn member_user_ids(&self, competition_id: Uuid) -> AppResult<Vec<Uuid>> {
        let state = self.state.read().await;
        Ok(state
            .participants
            .values()
            .filter(|p| {
                p.competition_id == competition_id
                    && matches!(
                        p.status,
                        ParticipantStatus::Invited | ParticipantStatus::Active
                    )
            })
            .map(|p| p.user_id)
            .collect())
    }

    async fn active_for_user(&self, user_id: Uuid) -> AppResult<Vec<Participant>> {
        let state = self.state.read().await;
        Ok(state
            .participants
            .values()
            .filter(|p| p.user_id == user_id && p.status == ParticipantStatus::Active)
            .cloned()
            .collect())
    }

    async fn add_progress(&self, competition_id: Uuid, user_id: Uuid, delta: f64) -> AppResult<()> {
        let mut state = self.state.write().await;
        if let Some(participant) = state.participants.get_mut(&(competition_id, user_id)) {
            participant.progress += delta;
        }
        Ok(())
    }
}

#[async_trait]
impl ActivityStore for MemoryStore {
    async fn insert(&self, new: NewActivity) -> AppResult<Activity> {
        let activity = Activity {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            kind: new.kind,
            distance_km: new.distance_km,
            duration_seconds: new.duration_seconds,
            steps: new.steps,
            calories: new.calories,
            recorded_at: new.recorded_at,
        };
        self.state.write().await.activities.push(activity.clone());
        Ok(activity)
    }

    async fn aggregate_progress(
        &self,
        user_ids: &[Uuid],
        kind: CompetitionKind,
        activity_kinds: &[ActivityKind],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<HashMap<Uuid, f64>> {
        let state = self.state.read().await;
        let mut totals = HashMap::new();
        for activity in &state.activities {
            if user_ids.contains(&activity.user_id)
                && activity_kinds.contains(&activity.kind)
                && activity.recorded_at >= from
                && activity.recorded_at <= to
            {
                *totals.entry(activity.user_id).or_insert(0.0) += activity.metric(kind);
            }
        }
        Ok(totals)
    }
}
