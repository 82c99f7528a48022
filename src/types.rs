//! Common types used throughout the scheduler and rating engine

use crate::error::{AmericanoError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Unique identifier for players
pub type PlayerId = String;

/// Unique, order-comparable identifier for matches
pub type MatchId = u64;

/// Integer rating value
pub type Rating = i32;

/// Two player ids playing on the same side
pub type Team = [PlayerId; 2];

/// Rating every player starts from
pub const STARTING_RATING: Rating = 1500;

/// Rated matches a player needs before leaving provisional status
pub const PROVISIONAL_MATCHES: u32 = 20;

/// A single entry of a player's rating history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EloHistoryEntry {
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
    pub rating: Rating,
    pub change: i32,
    pub match_id: MatchId,
}

/// Per-player rating state
///
/// Only [`crate::rating::apply_rating_update`] produces new values of this
/// type once a player exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EloState {
    pub current: Rating,
    pub peak: Rating,
    #[serde(with = "chrono::serde::ts_milliseconds_option")]
    pub peak_date: Option<DateTime<Utc>>,
    pub history: Vec<EloHistoryEntry>,
    pub provisional: bool,
    pub matches_for_rating: u32,
}

impl EloState {
    /// Fresh state for a player who has never been rated
    pub fn new() -> Self {
        Self::starting_at(STARTING_RATING)
    }

    /// Fresh state starting from a custom rating
    pub fn starting_at(rating: Rating) -> Self {
        Self {
            current: rating,
            peak: rating,
            peak_date: None,
            history: Vec::new(),
            provisional: true,
            matches_for_rating: 0,
        }
    }
}

impl Default for EloState {
    fn default() -> Self {
        Self::new()
    }
}

/// A registered player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(default)]
    pub elo_state: EloState,
}

impl Player {
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            elo_state: EloState::new(),
        }
    }
}

/// A doubles match between two teams of two
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: MatchId,
    pub teams: [Team; 2],
    pub score: [u32; 2],
    pub completed: bool,
    #[serde(default)]
    pub skipped: bool,
}

impl Match {
    /// Create an unscored match
    pub fn new(id: MatchId, team_a: Team, team_b: Team) -> Self {
        Self {
            id,
            teams: [team_a, team_b],
            score: [0, 0],
            completed: false,
            skipped: false,
        }
    }

    /// The four participating player ids, team order preserved
    pub fn players(&self) -> [&PlayerId; 4] {
        [
            &self.teams[0][0],
            &self.teams[0][1],
            &self.teams[1][0],
            &self.teams[1][1],
        ]
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.players().iter().any(|id| id.as_str() == player_id)
    }

    /// Whether the given two players were teammates in this match
    pub fn has_partnership(&self, a: &str, b: &str) -> bool {
        self.teams.iter().any(|team| {
            (team[0] == a && team[1] == b) || (team[0] == b && team[1] == a)
        })
    }

    /// Absolute score difference between the teams
    pub fn margin(&self) -> u32 {
        self.score[0].abs_diff(self.score[1])
    }

    /// Index of the winning team, `None` for a draw
    pub fn winning_team(&self) -> Option<usize> {
        match self.score[0].cmp(&self.score[1]) {
            std::cmp::Ordering::Greater => Some(0),
            std::cmp::Ordering::Less => Some(1),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Check the structural invariants of a match
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for id in self.players() {
            if !seen.insert(id) {
                return Err(AmericanoError::InvalidMatch {
                    match_id: self.id,
                    reason: format!("player {} appears more than once", id),
                }
                .into());
            }
        }

        if self.completed && self.skipped {
            return Err(AmericanoError::InvalidMatch {
                match_id: self.id,
                reason: "match cannot be both completed and skipped".to_string(),
            }
            .into());
        }

        Ok(())
    }
}

/// One generated round of a tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub round_number: u32,
    pub matches: Vec<Match>,
    pub sit_outs: Vec<Player>,
}

impl Round {
    /// Every match is either completed or skipped
    pub fn is_complete(&self) -> bool {
        !self.matches.is_empty() && self.matches.iter().all(|m| m.completed || m.skipped)
    }

    /// Check that the round accounts for every player of the active pool exactly once
    pub fn validate(&self, pool_len: usize) -> Result<()> {
        let accounted = self.sit_outs.len() + 4 * self.matches.len();
        if accounted != pool_len {
            return Err(AmericanoError::InvalidRound {
                round_number: self.round_number,
                reason: format!(
                    "{} sit-outs and {} matches account for {} of {} players",
                    self.sit_outs.len(),
                    self.matches.len(),
                    accounted,
                    pool_len
                ),
            }
            .into());
        }

        let mut seen = HashSet::new();
        let sitting = self.sit_outs.iter().map(|p| &p.id);
        let playing = self.matches.iter().flat_map(|m| m.players());
        for id in sitting.chain(playing) {
            if !seen.insert(id) {
                return Err(AmericanoError::DuplicatePlayer {
                    player_id: id.clone(),
                }
                .into());
            }
        }

        Ok(())
    }
}
