//! Utility functions shared by the scheduler, tournament and store

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a new unique tournament ID
pub fn generate_tournament_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generate a new unique player ID
pub fn generate_player_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Get the current UTC timestamp at millisecond precision
///
/// Stored timestamps are persisted in milliseconds, so anything finer
/// would not survive a save/load cycle.
pub fn current_timestamp() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}
