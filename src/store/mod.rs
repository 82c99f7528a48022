//! Persistence gateway for players and rated matches
//!
//! Stores offer plain whole-collection read/replace. There is no
//! transactional guarantee; a single controller serializes its own
//! read-modify-write cycles.

pub mod json_file;
pub mod memory;

use crate::error::Result;
use crate::rating::MatchDeltas;
use crate::types::{Match, Player};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;

/// A rated match as persisted in the match history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    #[serde(flatten)]
    pub game: Match,
    pub tournament_id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
    pub elo_data: MatchDeltas,
}

/// Trait for player and match persistence
pub trait PlayerStore: Send + Sync {
    /// Load every stored player
    fn load_players(&self) -> Result<Vec<Player>>;

    /// Replace the stored players
    fn save_players(&self, players: &[Player]) -> Result<()>;

    /// Load every stored match record
    fn load_matches(&self) -> Result<Vec<MatchRecord>>;

    /// Replace the stored match records
    fn save_matches(&self, matches: &[MatchRecord]) -> Result<()>;

    /// Look up one player by id
    fn find_player(&self, player_id: &str) -> Result<Option<Player>> {
        Ok(self
            .load_players()?
            .into_iter()
            .find(|player| player.id == player_id))
    }

    /// Insert a player or replace the one with the same id
    fn upsert_player(&self, player: Player) -> Result<()> {
        let mut players = self.load_players()?;
        match players.iter_mut().find(|existing| existing.id == player.id) {
            Some(existing) => *existing = player,
            None => players.push(player),
        }
        self.save_players(&players)
    }

    /// Append one record to the match history
    fn append_match(&self, record: MatchRecord) -> Result<()> {
        let mut matches = self.load_matches()?;
        matches.push(record);
        self.save_matches(&matches)
    }
}
