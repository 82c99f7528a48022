//! Rating calculator trait and the ELO implementation
//!
//! This module defines the interface for rating calculations and the
//! margin-weighted team ELO used for doubles matches.

use crate::config::RatingConfig;
use crate::error::Result;
use crate::rating::elo::{expected_score, round_delta, MatchDeltas};
use crate::types::{EloState, Match, MatchId, PlayerId, Rating};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

/// Trait for calculating rating changes after matches
pub trait RatingCalculator: Send + Sync {
    /// Calculate per-player rating changes for a scored match
    ///
    /// # Arguments
    /// * `game` - The match with its final score
    /// * `ratings` - Current rating per player; absent players use the starting rating
    /// * `match_counts` - Rated-match count per player; absent players count as 0
    fn compute_match_deltas(
        &self,
        game: &Match,
        ratings: &HashMap<PlayerId, Rating>,
        match_counts: &HashMap<PlayerId, u32>,
    ) -> Result<MatchDeltas>;

    /// Apply one rating change to a player's state
    fn apply_update(
        &self,
        state: &EloState,
        delta: i32,
        match_id: MatchId,
        timestamp: DateTime<Utc>,
    ) -> EloState;

    /// Get the initial state for new players
    fn initial_state(&self) -> EloState;

    /// Get current configuration
    fn config(&self) -> &RatingConfig;
}

/// Margin-of-victory weighted ELO for two-versus-two matches
#[derive(Debug, Clone, Default)]
pub struct EloCalculator {
    config: RatingConfig,
}

impl EloCalculator {
    /// Create a new ELO calculator
    pub fn new(config: RatingConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self { config })
    }

    /// Calculator with the standard constants
    pub const fn standard() -> Self {
        Self {
            config: RatingConfig::STANDARD,
        }
    }

    /// K-factor for a player with the given number of rated matches
    pub fn k_factor(&self, matches_for_rating: u32) -> f64 {
        if matches_for_rating < self.config.established_after {
            self.config.k_new
        } else if matches_for_rating < self.config.master_after {
            self.config.k_established
        } else {
            self.config.k_master
        }
    }

    /// Multiplier for a margin of victory, capped at `margin_cap`
    pub fn score_multiplier(&self, margin_of_victory: u32) -> f64 {
        let capped = margin_of_victory.min(self.config.margin_cap);
        self.config.multiplier_base + self.config.multiplier_step * f64::from(capped)
    }
}

impl RatingCalculator for EloCalculator {
    fn compute_match_deltas(
        &self,
        game: &Match,
        ratings: &HashMap<PlayerId, Rating>,
        match_counts: &HashMap<PlayerId, u32>,
    ) -> Result<MatchDeltas> {
        game.validate()?;

        let rating_of = |id: &PlayerId| {
            ratings
                .get(id)
                .copied()
                .unwrap_or(self.config.starting_rating)
        };
        let count_of = |id: &PlayerId| match_counts.get(id).copied().unwrap_or(0);

        let team_elos = game
            .teams
            .clone()
            .map(|team| (f64::from(rating_of(&team[0])) + f64::from(rating_of(&team[1]))) / 2.0);

        let first_actual = match game.winning_team() {
            Some(0) => 1.0,
            Some(_) => 0.0,
            None => 0.5,
        };
        let actual = [first_actual, 1.0 - first_actual];

        let expected_outcome = expected_score(team_elos[0], team_elos[1]);
        let expected = [expected_outcome, 1.0 - expected_outcome];

        let mov = game.margin();
        let multiplier = self.score_multiplier(mov);

        let mut before_ratings = HashMap::with_capacity(4);
        let mut after_ratings = HashMap::with_capacity(4);
        let mut changes = HashMap::with_capacity(4);

        for (side, team) in game.teams.iter().enumerate() {
            for player_id in team {
                let before = rating_of(player_id);
                // Each player's own K-factor scales the shared team outcome
                let k = self.k_factor(count_of(player_id));
                let delta = round_delta(k * (actual[side] - expected[side]) * multiplier);

                before_ratings.insert(player_id.clone(), before);
                after_ratings.insert(player_id.clone(), before + delta);
                changes.insert(player_id.clone(), delta);
            }
        }

        debug!(
            match_id = game.id,
            team_elos = ?team_elos,
            expected_outcome,
            multiplier,
            mov,
            "Computed match rating deltas"
        );

        Ok(MatchDeltas {
            before_ratings,
            after_ratings,
            changes,
            team_elos,
            expected_outcome,
            score_multiplier: multiplier,
            mov,
        })
    }

    fn apply_update(
        &self,
        state: &EloState,
        delta: i32,
        match_id: MatchId,
        timestamp: DateTime<Utc>,
    ) -> EloState {
        state.updated(delta, match_id, timestamp, self.config.provisional_matches)
    }

    fn initial_state(&self) -> EloState {
        EloState::starting_at(self.config.starting_rating)
    }

    fn config(&self) -> &RatingConfig {
        &self.config
    }
}
