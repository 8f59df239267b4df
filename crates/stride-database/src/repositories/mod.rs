//! PostgreSQL repository implementations of the store traits.

pub mod activity;
pub mod competition;
pub mod friendship;
pub mod participant;
pub mod user;

pub use activity::ActivityRepository;
pub use competition::CompetitionRepository;
pub use friendship::FriendshipRepository;
pub use participant::ParticipantRepository;
pub use user::UserRepository;
