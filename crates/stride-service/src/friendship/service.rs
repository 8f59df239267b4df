//! Friendship lifecycle service.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use stride_core::error::{AppError, ErrorKind};
use stride_core::events::{NotificationEvent, NotificationKind};
use stride_core::types::pagination::{PageRequest, PageResponse};
use stride_database::{FriendshipStore, UserStore};
use stride_entity::friendship::{Friendship, FriendshipStatus, PairKey};
use stride_entity::user::{User, UserProfile};
use stride_notify::Notifier;

use super::state::{RequestOutcome, apply_request};
use crate::context::RequestContext;

/// One accepted friendship from the caller's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendEntry {
    /// The counterpart's public profile.
    pub user: UserProfile,
    /// When the pair became friends.
    pub friends_since: DateTime<Utc>,
}

/// One incoming pending request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestEntry {
    /// The friendship record to accept or reject.
    pub request_id: Uuid,
    /// Who sent it.
    pub from: UserProfile,
    /// When it was sent.
    pub sent_at: DateTime<Utc>,
}

/// Result of accepting a request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcceptedFriendship {
    /// The now-accepted record.
    pub friendship: Friendship,
    /// The new friend's profile.
    pub friend: UserProfile,
}

/// Relationship between the caller and another user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum RelationshipStatus {
    /// No record exists for the pair.
    None,
    /// The pair is accepted.
    Friends {
        /// Acceptance time.
        since: DateTime<Utc>,
    },
    /// The caller sent an unanswered request.
    PendingSent {
        /// Request time.
        since: DateTime<Utc>,
    },
    /// The other user sent an unanswered request.
    PendingReceived {
        /// Request time.
        since: DateTime<Utc>,
        /// Record id to pass to accept/reject.
        request_id: Uuid,
    },
}

/// Manages the friendship relationship state machine.
#[derive(Debug, Clone)]
pub struct FriendshipService {
    /// User lookups.
    users: Arc<dyn UserStore>,
    /// Friendship records.
    friendships: Arc<dyn FriendshipStore>,
    /// Outbound notifications.
    notifier: Notifier,
}

impl FriendshipService {
    /// Creates a new friendship service.
    pub fn new(
        users: Arc<dyn UserStore>,
        friendships: Arc<dyn FriendshipStore>,
        notifier: Notifier,
    ) -> Self {
        Self {
            users,
            friendships,
            notifier,
        }
    }

    /// Send a friend request to `receiver_id`.
    ///
    /// Mutual pending requests collapse: if the receiver already has an
    /// unanswered request to the caller, that record is accepted instead
    /// of creating a mirror one.
    pub async fn send_request(
        &self,
        ctx: &RequestContext,
        receiver_id: Uuid,
    ) -> Result<Friendship, AppError> {
        // Rejects self-reference.
        PairKey::new(ctx.user_id, receiver_id)?;

        let receiver = self
            .users
            .find_by_id(receiver_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let existing = self.friendships.find_pair(ctx.user_id, receiver_id).await?;

        match apply_request(existing.as_ref(), ctx.user_id) {
            RequestOutcome::AlreadyFriends => {
                Err(AppError::conflict("You are already friends with this user"))
            }
            RequestOutcome::AlreadyRequested => {
                Err(AppError::conflict("Friend request already sent"))
            }
            RequestOutcome::AcceptExisting(id) => self.collapse_mutual(ctx, receiver_id, id).await,
            RequestOutcome::CreatePending => match self.create_pending(ctx, &receiver).await {
                Ok(friendship) => Ok(friendship),
                // A mirror request can land between find_pair and the
                // insert; the unique pair key turns that into a Conflict.
                // Decide again over the record that won the race, so mutual
                // requests collapse to accepted even when they interleave.
                Err(e) if e.kind == ErrorKind::Conflict => {
                    let existing = self
                        .friendships
                        .find_pair(ctx.user_id, receiver_id)
                        .await?
                        .ok_or(e)?;
                    match apply_request(Some(&existing), ctx.user_id) {
                        RequestOutcome::AcceptExisting(id) => {
                            self.collapse_mutual(ctx, receiver_id, id).await
                        }
                        RequestOutcome::AlreadyFriends => {
                            Err(AppError::conflict("You are already friends with this user"))
                        }
                        _ => Err(AppError::conflict("Friend request already sent")),
                    }
                }
                Err(e) => Err(e),
            },
        }
    }

    /// Accepts the counterpart's pending request instead of mirroring it.
    async fn collapse_mutual(
        &self,
        ctx: &RequestContext,
        receiver_id: Uuid,
        id: Uuid,
    ) -> Result<Friendship, AppError> {
        let friendship = self.friendships.set_accepted(id, Utc::now()).await?;
        info!(
            friendship_id = %friendship.id,
            user_id = %ctx.user_id,
            other = %receiver_id,
            "Mutual friend requests collapsed into acceptance"
        );
        self.notifier.notify(NotificationEvent::new(
            receiver_id,
            NotificationKind::FriendAccepted,
            "Friend request accepted",
            format!("{} accepted your friend request", ctx.username),
            serde_json::json!({ "friendshipId": friendship.id, "userId": ctx.user_id }),
        ));
        Ok(friendship)
    }

    /// Inserts the pending record and notifies the receiver.
    async fn create_pending(
        &self,
        ctx: &RequestContext,
        receiver: &User,
    ) -> Result<Friendship, AppError> {
        let friendship = self
            .friendships
            .insert_pending(ctx.user_id, receiver.id)
            .await?;
        info!(
            friendship_id = %friendship.id,
            sender = %ctx.user_id,
            receiver = %receiver.id,
            "Friend request sent"
        );
        self.notifier.notify(NotificationEvent::new(
            receiver.id,
            NotificationKind::FriendRequest,
            "New friend request",
            format!("{} wants to be your friend", ctx.username),
            serde_json::json!({ "friendshipId": friendship.id, "senderId": ctx.user_id }),
        ));
        Ok(friendship)
    }

    /// Accept an incoming pending request addressed to the caller.
    pub async fn accept_request(
        &self,
        ctx: &RequestContext,
        request_id: Uuid,
    ) -> Result<AcceptedFriendship, AppError> {
        let friendship = self.incoming_pending(ctx, request_id).await?;
        let accepted = self
            .friendships
            .set_accepted(friendship.id, Utc::now())
            .await?;

        info!(
            friendship_id = %accepted.id,
            user_id = %ctx.user_id,
            "Friend request accepted"
        );
        self.notifier.notify(NotificationEvent::new(
            accepted.sender_id,
            NotificationKind::FriendAccepted,
            "Friend request accepted",
            format!("{} accepted your friend request", ctx.username),
            serde_json::json!({ "friendshipId": accepted.id, "userId": ctx.user_id }),
        ));

        let friend = self
            .users
            .find_by_id(accepted.sender_id)
            .await?
            .map(|u| u.profile())
            .ok_or_else(|| AppError::not_found("User not found"))?;

        Ok(AcceptedFriendship {
            friendship: accepted,
            friend,
        })
    }

    /// Reject an incoming pending request. The record is deleted, so a
    /// rejected sender may ask again later.
    pub async fn reject_request(
        &self,
        ctx: &RequestContext,
        request_id: Uuid,
    ) -> Result<(), AppError> {
        let friendship = self.incoming_pending(ctx, request_id).await?;
        self.friendships.delete(friendship.id).await?;
        info!(
            friendship_id = %friendship.id,
            user_id = %ctx.user_id,
            "Friend request rejected"
        );
        Ok(())
    }

    /// Remove an accepted friend. Deletes the pair record.
    pub async fn remove_friend(
        &self,
        ctx: &RequestContext,
        friend_id: Uuid,
    ) -> Result<(), AppError> {
        let friendship = self
            .friendships
            .find_pair(ctx.user_id, friend_id)
            .await?
            .filter(|f| f.status == FriendshipStatus::Accepted)
            .ok_or_else(|| AppError::not_found("Friendship not found"))?;

        self.friendships.delete(friendship.id).await?;
        info!(
            friendship_id = %friendship.id,
            user_id = %ctx.user_id,
            friend_id = %friend_id,
            "Friend removed"
        );
        Ok(())
    }

    /// The caller's accepted friends, newest first.
    pub async fn list_friends(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<PageResponse<FriendEntry>, AppError> {
        let friendships = self.friendships.list_accepted(ctx.user_id, &page).await?;
        let counterparts: Vec<Uuid> = friendships
            .items
            .iter()
            .map(|f| f.counterpart(ctx.user_id))
            .collect();
        let profiles = self.profile_map(&counterparts).await?;

        Ok(friendships.map(|f| {
            let other = f.counterpart(ctx.user_id);
            FriendEntry {
                user: profiles.get(&other).cloned().unwrap_or_else(|| UserProfile {
                    id: other,
                    username: String::new(),
                    display_name: None,
                    level: 0,
                }),
                friends_since: f.updated_at,
            }
        }))
    }

    /// Incoming pending requests for the caller, newest first.
    pub async fn list_requests(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> Result<PageResponse<FriendRequestEntry>, AppError> {
        let requests = self
            .friendships
            .list_incoming_pending(ctx.user_id, &page)
            .await?;
        let senders: Vec<Uuid> = requests.items.iter().map(|f| f.sender_id).collect();
        let profiles = self.profile_map(&senders).await?;

        Ok(requests.map(|f| FriendRequestEntry {
            request_id: f.id,
            from: profiles
                .get(&f.sender_id)
                .cloned()
                .unwrap_or_else(|| UserProfile {
                    id: f.sender_id,
                    username: String::new(),
                    display_name: None,
                    level: 0,
                }),
            sent_at: f.created_at,
        }))
    }

    /// Friend suggestions: everyone except the caller and anyone already
    /// related to them by any record, best-leveled first.
    pub async fn suggestions(
        &self,
        ctx: &RequestContext,
        query: Option<&str>,
        page: PageRequest,
    ) -> Result<PageResponse<UserProfile>, AppError> {
        let mut exclude = self.friendships.related_user_ids(ctx.user_id).await?;
        exclude.push(ctx.user_id);
        self.users
            .suggestion_candidates(&exclude, query, &page)
            .await
    }

    /// Users who are accepted friends of both the caller and `other_id`.
    pub async fn common_friends(
        &self,
        ctx: &RequestContext,
        other_id: Uuid,
        page: PageRequest,
    ) -> Result<PageResponse<UserProfile>, AppError> {
        PairKey::new(ctx.user_id, other_id)?;

        let mine = self.friendships.friend_ids(ctx.user_id).await?;
        let theirs = self.friendships.friend_ids(other_id).await?;
        let common: Vec<Uuid> = mine.into_iter().filter(|id| theirs.contains(id)).collect();

        let mut profiles = self.users.profiles_by_ids(&common).await?;
        profiles.sort_by(|a, b| a.username.cmp(&b.username));

        let total = profiles.len() as u64;
        let start = (page.offset() as usize).min(profiles.len());
        let end = (start + page.limit() as usize).min(profiles.len());
        Ok(PageResponse::new(
            profiles[start..end].to_vec(),
            page.page,
            page.page_size,
            total,
        ))
    }

    /// The relationship between the caller and another user.
    pub async fn status(
        &self,
        ctx: &RequestContext,
        other_id: Uuid,
    ) -> Result<RelationshipStatus, AppError> {
        PairKey::new(ctx.user_id, other_id)?;

        Ok(
            match self.friendships.find_pair(ctx.user_id, other_id).await? {
                None => RelationshipStatus::None,
                Some(f) if f.status == FriendshipStatus::Accepted => RelationshipStatus::Friends {
                    since: f.updated_at,
                },
                Some(f) if f.sender_id == ctx.user_id => RelationshipStatus::PendingSent {
                    since: f.created_at,
                },
                Some(f) => RelationshipStatus::PendingReceived {
                    since: f.created_at,
                    request_id: f.id,
                },
            },
        )
    }

    /// Load a pending request addressed to the caller, hiding other
    /// users' records behind `NotFound`.
    async fn incoming_pending(
        &self,
        ctx: &RequestContext,
        request_id: Uuid,
    ) -> Result<Friendship, AppError> {
        self.friendships
            .find_by_id(request_id)
            .await?
            .filter(|f| f.status == FriendshipStatus::Pending && f.receiver_id == ctx.user_id)
            .ok_or_else(|| AppError::not_found("Friend request not found"))
    }

    async fn profile_map(&self, ids: &[Uuid]) -> Result<HashMap<Uuid, UserProfile>, AppError> {
        Ok(self
            .users
            .profiles_by_ids(ids)
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect())
    }
}
