//! Pure leaderboard ranking.

use std::collections::HashMap;

use uuid::Uuid;

use stride_entity::competition::Participant;

/// One ranked leaderboard row, before profile joining.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedParticipant {
    /// 1-based position.
    pub rank: u32,
    /// The participant.
    pub user_id: Uuid,
    /// Aggregated progress in the competition's metric.
    pub progress: f64,
    /// Whether the competition goal has been reached.
    pub goal_met: bool,
}

/// Rank active participants by progress descending, breaking ties by the
/// earlier `joined_at`. Participants with no qualifying activities score 0.
pub fn rank_participants(
    participants: &[Participant],
    progress: &HashMap<Uuid, f64>,
    goal: f64,
) -> Vec<RankedParticipant> {
    let mut rows: Vec<(&Participant, f64)> = participants
        .iter()
        .map(|p| (p, progress.get(&p.user_id).copied().unwrap_or(0.0)))
        .collect();

    rows.sort_by(|(a, pa), (b, pb)| {
        pb.partial_cmp(pa)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                let a_joined = a.joined_at.unwrap_or(a.invited_at);
                let b_joined = b.joined_at.unwrap_or(b.invited_at);
                a_joined.cmp(&b_joined)
            })
    });

    rows.into_iter()
        .enumerate()
        .map(|(i, (p, score))| RankedParticipant {
            rank: (i + 1) as u32,
            user_id: p.user_id,
            progress: score,
            goal_met: score >= goal,
        })
        .collect()
}
