//! ELO primitives with the standard constants
//!
//! Thin free-function surface over [`EloCalculator::standard`] plus the
//! logistic expectation model shared by every calculator.

use crate::error::Result;
use crate::rating::calculator::{EloCalculator, RatingCalculator};
use crate::types::{Match, PlayerId, Rating};
use serde::{Deserialize, Serialize};
use skillratings::elo::EloRating;
use std::collections::HashMap;

/// Read-only result of rating one match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDeltas {
    pub before_ratings: HashMap<PlayerId, Rating>,
    pub after_ratings: HashMap<PlayerId, Rating>,
    pub changes: HashMap<PlayerId, i32>,
    /// Average rating of each team
    pub team_elos: [f64; 2],
    /// Expected outcome for the first team
    pub expected_outcome: f64,
    pub score_multiplier: f64,
    pub mov: u32,
}

/// Win probability of a side rated `rating_a` against one rated `rating_b`
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    let (expected_a, _) = skillratings::elo::expected_score(
        &EloRating { rating: rating_a },
        &EloRating { rating: rating_b },
    );
    expected_a
}

/// K-factor for a player with the given number of rated matches
pub fn k_factor(matches_for_rating: u32) -> f64 {
    EloCalculator::standard().k_factor(matches_for_rating)
}

/// Multiplier applied for a margin of victory
pub fn score_multiplier(margin_of_victory: u32) -> f64 {
    EloCalculator::standard().score_multiplier(margin_of_victory)
}

/// Rate a scored match with the standard constants
pub fn compute_match_deltas(
    game: &Match,
    ratings: &HashMap<PlayerId, Rating>,
    match_counts: &HashMap<PlayerId, u32>,
) -> Result<MatchDeltas> {
    EloCalculator::standard().compute_match_deltas(game, ratings, match_counts)
}

/// Round half away from zero so equal-K winners and losers mirror each other
pub(crate) fn round_delta(value: f64) -> i32 {
    value.round() as i32
}
