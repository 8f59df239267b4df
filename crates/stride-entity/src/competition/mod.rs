//! Competition and participant entities.

pub mod model;
pub mod participant;

pub use model::{
    Competition, CompetitionKind, CompetitionPatch, CompetitionStatusFilter, NewCompetition,
};
pub use participant::{Participant, ParticipantStatus};
