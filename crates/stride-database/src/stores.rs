//! Store traits — the seam between the service layer and persistence.
//!
//! Each trait hides the underlying query language behind predicate-style
//! methods. Two implementations exist: PostgreSQL ([`crate::repositories`])
//! and in-memory ([`crate::memory`]).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use stride_core::result::AppResult;
use stride_core::types::pagination::{PageRequest, PageResponse};
use stride_entity::activity::{Activity, ActivityKind, NewActivity};
use stride_entity::competition::{
    Competition, CompetitionKind, CompetitionStatusFilter, NewCompetition, Participant,
    ParticipantStatus,
};
use stride_entity::friendship::Friendship;
use stride_entity::user::{User, UserProfile};

/// Read access to user records.
#[async_trait]
pub trait UserStore: std::fmt::Debug + Send + Sync {
    /// Find a user by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Profile projections for a set of user ids, in no particular order.
    /// Unknown ids are silently omitted.
    async fn profiles_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<UserProfile>>;

    /// Friend-suggestion candidates: every user except those in `exclude`,
    /// optionally filtered by a case-insensitive substring match on
    /// username, display name, or email; ordered by level descending then
    /// username ascending.
    async fn suggestion_candidates(
        &self,
        exclude: &[Uuid],
        query: Option<&str>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<UserProfile>>;
}

/// Persistence of friendship records, keyed by the unordered user pair.
#[async_trait]
pub trait FriendshipStore: std::fmt::Debug + Send + Sync {
    /// Find a friendship by record id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Friendship>>;

    /// Find the record for an unordered user pair, if any.
    async fn find_pair(&self, a: Uuid, b: Uuid) -> AppResult<Option<Friendship>>;

    /// Insert a new pending friendship.
    ///
    /// Must fail with `ErrorKind::Conflict` when a record for the pair
    /// already exists; this closes the concurrent mutual-request race.
    async fn insert_pending(&self, sender_id: Uuid, receiver_id: Uuid) -> AppResult<Friendship>;

    /// Mark a friendship accepted and bump `updated_at`.
    async fn set_accepted(&self, id: Uuid, now: DateTime<Utc>) -> AppResult<Friendship>;

    /// Delete a friendship record.
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Accepted friendships involving `user_id`, newest `updated_at` first.
    async fn list_accepted(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Friendship>>;

    /// Incoming pending requests for `user_id`, newest `created_at` first.
    async fn list_incoming_pending(
        &self,
        user_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Friendship>>;

    /// Ids of all accepted friends of `user_id`.
    async fn friend_ids(&self, user_id: Uuid) -> AppResult<Vec<Uuid>>;

    /// Ids of every user related to `user_id` by any record (accepted, or
    /// pending in either direction). Used to exclude suggestion candidates.
    async fn related_user_ids(&self, user_id: Uuid) -> AppResult<Vec<Uuid>>;
}

/// Persistence of competitions.
#[async_trait]
pub trait CompetitionStore: std::fmt::Debug + Send + Sync {
    /// Insert a new competition.
    async fn insert(&self, new: NewCompetition) -> AppResult<Competition>;

    /// Find a competition by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Competition>>;

    /// Competitions by ids; unknown ids are omitted.
    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<Competition>>;

    /// Persist the full updated row of a competition.
    async fn update(&self, competition: &Competition) -> AppResult<()>;

    /// Competitions visible to `user_id` (public ones plus private ones
    /// they created or participate in), optionally filtered by derived
    /// status at `now`, newest `starts_at` first.
    async fn list_visible(
        &self,
        user_id: Uuid,
        status: Option<CompetitionStatusFilter>,
        now: DateTime<Utc>,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Competition>>;
}

/// Persistence of competition membership records.
#[async_trait]
pub trait ParticipantStore: std::fmt::Debug + Send + Sync {
    /// Find the record for `(competition_id, user_id)`, if any.
    async fn find(&self, competition_id: Uuid, user_id: Uuid) -> AppResult<Option<Participant>>;

    /// Insert a participant record. Fails with `Conflict` when the
    /// `(competition_id, user_id)` pair already exists.
    async fn insert(&self, participant: &Participant) -> AppResult<()>;

    /// Update status (and `joined_at`/`invited_at` when given) of a record.
    async fn set_status(
        &self,
        competition_id: Uuid,
        user_id: Uuid,
        status: ParticipantStatus,
        joined_at: Option<DateTime<Utc>>,
        invited_at: Option<DateTime<Utc>>,
    ) -> AppResult<()>;

    /// All participant records of a competition, any status, newest invite
    /// first.
    async fn list(
        &self,
        competition_id: Uuid,
        page: &PageRequest,
    ) -> AppResult<PageResponse<Participant>>;

    /// All `active` participants of a competition.
    async fn list_active(&self, competition_id: Uuid) -> AppResult<Vec<Participant>>;

    /// User ids of every current participant (invited or active).
    async fn member_user_ids(&self, competition_id: Uuid) -> AppResult<Vec<Uuid>>;

    /// The user's `active` participations across all competitions.
    async fn active_for_user(&self, user_id: Uuid) -> AppResult<Vec<Participant>>;

    /// Add `delta` to the denormalized progress of one record.
    async fn add_progress(&self, competition_id: Uuid, user_id: Uuid, delta: f64) -> AppResult<()>;
}

/// Persistence and aggregation of activities.
#[async_trait]
pub trait ActivityStore: std::fmt::Debug + Send + Sync {
    /// Record a new activity.
    async fn insert(&self, new: NewActivity) -> AppResult<Activity>;

    /// Sum the metric selected by `kind` over each user's activities whose
    /// activity kind is in `activity_kinds` and whose `recorded_at` lies in
    /// `[from, to]`. Users with no qualifying activities are omitted.
    async fn aggregate_progress(
        &self,
        user_ids: &[Uuid],
        kind: CompetitionKind,
        activity_kinds: &[ActivityKind],
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<HashMap<Uuid, f64>>;
}
