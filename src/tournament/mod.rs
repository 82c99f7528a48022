//! Tournament lifecycle on top of the scheduler and rating engine
//!
//! A [`Tournament`] owns the roster order, the rotation index and the
//! pairing cycle state for one session, and writes rating changes through
//! a [`crate::store::PlayerStore`].

pub mod session;
pub mod summary;

// Re-export commonly used types
pub use session::Tournament;
pub use summary::{MatchOutcome, PlayerSummary, TierChangeEvent, TournamentSummary};
