//! Americano - rotating-partner doubles scheduling with ELO ratings
//!
//! This crate provides fair sit-out rotation and team assignment for
//! Americano rounds, a margin-weighted ELO engine for two-versus-two
//! matches, and a tournament controller tying both to a player store.

pub mod config;
pub mod error;
pub mod rating;
pub mod scheduler;
pub mod store;
pub mod tournament;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{AmericanoError, Result};
pub use types::*;

// Re-export key components
pub use rating::{EloCalculator, RatingCalculator};
pub use scheduler::{GeneratedRound, PairingScheduler};
pub use store::{InMemoryStore, JsonFileStore, PlayerStore};
pub use tournament::Tournament;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
