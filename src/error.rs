//! Error types for the Americano scheduler and rating engine
//!
//! Domain failures are raised as [`AmericanoError`] and carried through
//! anyhow so callers can downcast when they need to branch on the cause.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific scheduling and rating scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AmericanoError {
    #[error("Not enough players: need at least {required}, got {actual}")]
    NotEnoughPlayers { required: usize, actual: usize },

    #[error("Invalid court count {courts} for {players} players")]
    InvalidCourtCount { courts: usize, players: usize },

    #[error("Duplicate player: {player_id}")]
    DuplicatePlayer { player_id: String },

    #[error("Invalid match {match_id}: {reason}")]
    InvalidMatch { match_id: u64, reason: String },

    #[error("Match not found: {match_id}")]
    MatchNotFound { match_id: u64 },

    #[error("Match {match_id} has already been rated")]
    MatchAlreadyRated { match_id: u64 },

    #[error("Player not found: {player_id}")]
    PlayerNotFound { player_id: String },

    #[error("Invalid round {round_number}: {reason}")]
    InvalidRound { round_number: u32, reason: String },

    #[error("No round has been generated yet")]
    NoActiveRound,

    #[error("Tournament {tournament_id} has already ended")]
    TournamentEnded { tournament_id: String },

    #[error("Player {player_id} left without a partner")]
    UnpairedPlayer { player_id: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}
