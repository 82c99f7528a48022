//! In-memory store used by tests and simulations

use crate::error::{AmericanoError, Result};
use crate::store::{MatchRecord, PlayerStore};
use crate::types::Player;
use std::sync::RwLock;

/// In-memory player and match storage
#[derive(Debug, Default)]
pub struct InMemoryStore {
    players: RwLock<Vec<Player>>,
    matches: RwLock<Vec<MatchRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with players
    pub fn with_players(players: Vec<Player>) -> Self {
        Self {
            players: RwLock::new(players),
            matches: RwLock::new(Vec::new()),
        }
    }
}

fn lock_error(what: &str) -> AmericanoError {
    AmericanoError::Storage {
        message: format!("Failed to acquire {} lock", what),
    }
}

impl PlayerStore for InMemoryStore {
    fn load_players(&self) -> Result<Vec<Player>> {
        let players = self
            .players
            .read()
            .map_err(|_| lock_error("players read"))?;
        Ok(players.clone())
    }

    fn save_players(&self, players: &[Player]) -> Result<()> {
        let mut stored = self
            .players
            .write()
            .map_err(|_| lock_error("players write"))?;
        *stored = players.to_vec();
        Ok(())
    }

    fn load_matches(&self) -> Result<Vec<MatchRecord>> {
        let matches = self
            .matches
            .read()
            .map_err(|_| lock_error("matches read"))?;
        Ok(matches.clone())
    }

    fn save_matches(&self, matches: &[MatchRecord]) -> Result<()> {
        let mut stored = self
            .matches
            .write()
            .map_err(|_| lock_error("matches write"))?;
        *stored = matches.to_vec();
        Ok(())
    }
}
