//! Americano round scheduling
//!
//! This module handles sit-out rotation, the three-way pairing cycle of
//! four-player groups and greedy partner selection for larger pools.

pub mod generator;
pub mod pairing;
pub mod rotation;

// Re-export commonly used types
pub use generator::{GeneratedRound, PairingScheduler, MIN_PLAYERS};
pub use pairing::{count_partnerships, GroupKey, PairingHistory, Split, SPLITS};
pub use rotation::{next_rotation_index, sit_out_count, sit_out_indices};
