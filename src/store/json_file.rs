//! JSON file store: one file per collection inside a data directory

use crate::error::{AmericanoError, Result};
use crate::store::{MatchRecord, PlayerStore};
use crate::types::Player;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const PLAYERS_FILE: &str = "players.json";
const MATCHES_FILE: &str = "matches.json";

/// File-backed store writing `players.json` and `matches.json`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_collection<T: DeserializeOwned>(&self, file: &str) -> Result<Vec<T>> {
        let path = self.dir.join(file);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&path).map_err(|e| AmericanoError::Storage {
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;
        let items = serde_json::from_str(&contents).map_err(|e| AmericanoError::Storage {
            message: format!("Failed to parse {}: {}", path.display(), e),
        })?;
        Ok(items)
    }

    fn write_collection<T: Serialize>(&self, file: &str, items: &[T]) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| AmericanoError::Storage {
            message: format!("Failed to create {}: {}", self.dir.display(), e),
        })?;

        let path = self.dir.join(file);
        let staging = self.dir.join(format!("{}.tmp", file));
        let json = serde_json::to_vec_pretty(items).map_err(|e| AmericanoError::Storage {
            message: format!("Failed to serialize {}: {}", file, e),
        })?;

        // Replace the whole collection in one rename
        fs::write(&staging, json).map_err(|e| AmericanoError::Storage {
            message: format!("Failed to write {}: {}", staging.display(), e),
        })?;
        fs::rename(&staging, &path).map_err(|e| AmericanoError::Storage {
            message: format!("Failed to replace {}: {}", path.display(), e),
        })?;

        debug!(path = %path.display(), items = items.len(), "Saved collection");
        Ok(())
    }
}

impl PlayerStore for JsonFileStore {
    fn load_players(&self) -> Result<Vec<Player>> {
        self.read_collection(PLAYERS_FILE)
    }

    fn save_players(&self, players: &[Player]) -> Result<()> {
        self.write_collection(PLAYERS_FILE, players)
    }

    fn load_matches(&self) -> Result<Vec<MatchRecord>> {
        self.read_collection(MATCHES_FILE)
    }

    fn save_matches(&self, matches: &[MatchRecord]) -> Result<()> {
        self.write_collection(MATCHES_FILE, matches)
    }
}
