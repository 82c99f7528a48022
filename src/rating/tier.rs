//! Named rating bands

use crate::types::Rating;
use serde::{Deserialize, Serialize};

/// Rating band, ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Wood,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Master,
    Grandmaster,
}

/// Lower bound of each tier above wood; a rating at a bound belongs to the higher tier
const LOWER_BOUNDS: [(Rating, Tier); 6] = [
    (1300, Tier::Bronze),
    (1450, Tier::Silver),
    (1550, Tier::Gold),
    (1650, Tier::Platinum),
    (1800, Tier::Master),
    (2000, Tier::Grandmaster),
];

impl Tier {
    pub const ALL: [Tier; 7] = [
        Tier::Wood,
        Tier::Bronze,
        Tier::Silver,
        Tier::Gold,
        Tier::Platinum,
        Tier::Master,
        Tier::Grandmaster,
    ];

    /// Name shown to players (platinum is presented as Diamond)
    pub fn display_name(self) -> &'static str {
        match self {
            Tier::Wood => "Wood",
            Tier::Bronze => "Bronze",
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
            Tier::Platinum => "Diamond",
            Tier::Master => "Master",
            Tier::Grandmaster => "Grandmaster",
        }
    }

    /// Hex color code used for badges
    pub fn color(self) -> &'static str {
        match self {
            Tier::Wood => "#8B4513",
            Tier::Bronze => "#cd7f32",
            Tier::Silver => "#c0c0c0",
            Tier::Gold => "#ffd700",
            Tier::Platinum => "#e5e4e2",
            Tier::Master => "#9b59b6",
            Tier::Grandmaster => "#ff4444",
        }
    }

    /// Lowest rating in this tier
    pub fn min_rating(self) -> Rating {
        LOWER_BOUNDS
            .iter()
            .find(|(_, tier)| *tier == self)
            .map(|(bound, _)| *bound)
            .unwrap_or(0)
    }

    /// Highest rating in this tier, `None` for the open-ended top tier
    pub fn max_rating(self) -> Option<Rating> {
        LOWER_BOUNDS
            .iter()
            .find(|(_, tier)| *tier > self)
            .map(|(bound, _)| bound - 1)
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Classify a rating
pub fn tier(rating: Rating) -> Tier {
    LOWER_BOUNDS
        .iter()
        .rev()
        .find(|(bound, _)| rating >= *bound)
        .map(|(_, tier)| *tier)
        .unwrap_or(Tier::Wood)
}

/// One row of the tier table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierThreshold {
    pub tier: Tier,
    pub name: &'static str,
    pub min: Rating,
    pub max: Option<Rating>,
    pub color: &'static str,
}

/// Full tier table, lowest first
pub fn tier_thresholds() -> Vec<TierThreshold> {
    Tier::ALL
        .iter()
        .map(|&tier| TierThreshold {
            tier,
            name: tier.display_name(),
            min: tier.min_rating(),
            max: tier.max_rating(),
            color: tier.color(),
        })
        .collect()
}

/// `(from, to)` when a rating change crosses a tier boundary
pub fn tier_change(before: Rating, after: Rating) -> Option<(Tier, Tier)> {
    let (from, to) = (tier(before), tier(after));
    (from != to).then_some((from, to))
}
