//! Rating system configuration

use crate::error::{AmericanoError, Result};
use crate::types::{Rating, PROVISIONAL_MATCHES, STARTING_RATING};
use serde::{Deserialize, Serialize};

/// Constants of the ELO update law
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Rating assigned to unknown or new players
    pub starting_rating: Rating,
    /// Rated matches before a player stops being provisional
    pub provisional_matches: u32,
    /// K-factor below `established_after` matches
    pub k_new: f64,
    /// K-factor below `master_after` matches
    pub k_established: f64,
    /// K-factor from `master_after` matches on
    pub k_master: f64,
    pub established_after: u32,
    pub master_after: u32,
    /// Multiplier for a zero-margin result
    pub multiplier_base: f64,
    /// Multiplier added per point of margin
    pub multiplier_step: f64,
    /// Margin beyond which the multiplier stops growing
    pub margin_cap: u32,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl RatingConfig {
    /// The constants the free rating functions use
    pub const STANDARD: RatingConfig = RatingConfig {
        starting_rating: STARTING_RATING,
        provisional_matches: PROVISIONAL_MATCHES,
        k_new: 32.0,
        k_established: 24.0,
        k_master: 16.0,
        established_after: 20,
        master_after: 100,
        multiplier_base: 0.55,
        multiplier_step: 0.3,
        margin_cap: 5,
    };

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.k_new <= 0.0 || self.k_established <= 0.0 || self.k_master <= 0.0 {
            return Err(AmericanoError::Configuration {
                message: "K-factors must be positive".to_string(),
            }
            .into());
        }

        if self.established_after > self.master_after {
            return Err(AmericanoError::Configuration {
                message: "established_after must not exceed master_after".to_string(),
            }
            .into());
        }

        if self.multiplier_base <= 0.0 || self.multiplier_step < 0.0 {
            return Err(AmericanoError::Configuration {
                message: "Score multiplier must be positive".to_string(),
            }
            .into());
        }

        if self.starting_rating <= 0 {
            return Err(AmericanoError::Configuration {
                message: "Starting rating must be positive".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
