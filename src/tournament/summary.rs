//! End-of-session results

use crate::rating::{MatchDeltas, Tier};
use crate::types::{PlayerId, Rating};
use serde::{Deserialize, Serialize};

/// A player crossing a tier boundary after a rated match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierChangeEvent {
    pub player_id: PlayerId,
    pub player_name: String,
    pub old_tier: Tier,
    pub new_tier: Tier,
}

/// What finishing one match changed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOutcome {
    pub deltas: MatchDeltas,
    pub tier_changes: Vec<TierChangeEvent>,
}

/// One row of the final standings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub player_id: PlayerId,
    pub name: String,
    pub starting_rating: Rating,
    pub final_rating: Rating,
    pub change: i32,
    pub tier: Tier,
    pub trend: i32,
}

/// Results of an ended tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentSummary {
    pub tournament_id: String,
    pub rounds_played: usize,
    pub matches_completed: usize,
    pub matches_skipped: usize,
    /// Highest final rating first
    pub standings: Vec<PlayerSummary>,
}
