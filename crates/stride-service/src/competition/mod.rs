//! Competition lifecycle, membership, and leaderboard.

pub mod leaderboard;
pub mod service;

pub use leaderboard::{RankedParticipant, rank_participants};
pub use service::{
    CompetitionService, CreateCompetitionRequest, LeaderboardEntry, ParticipantEntry,
};
