//! ELO rating engine for doubles matches
//!
//! This module provides the expected-outcome model, the experience-based
//! K-factor, the margin-of-victory multiplier, rating state transitions
//! and tier classification.

pub mod calculator;
pub mod elo;
pub mod state;
pub mod tier;

// Re-export commonly used types
pub use calculator::{EloCalculator, RatingCalculator};
pub use elo::{compute_match_deltas, expected_score, k_factor, score_multiplier, MatchDeltas};
pub use state::{apply_rating_update, trend, DEFAULT_TREND_WINDOW};
pub use tier::{tier, tier_change, tier_thresholds, Tier, TierThreshold};
