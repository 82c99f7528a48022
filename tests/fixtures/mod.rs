//! Test fixtures and store implementations for integration testing

#![allow(dead_code)]

use americano::error::{AmericanoError, Result};
use americano::rating::EloCalculator;
use americano::scheduler::PairingScheduler;
use americano::store::{InMemoryStore, MatchRecord, PlayerStore};
use americano::tournament::Tournament;
use americano::types::{EloState, Player, Rating};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Roster of `n` players with ids `p0..pn`
pub fn roster(n: usize) -> Vec<Player> {
    (0..n)
        .map(|i| Player::new(format!("p{}", i), format!("Player {}", i)))
        .collect()
}

/// Roster where every player starts at `rating`
pub fn rated_roster(n: usize, rating: Rating) -> Vec<Player> {
    roster(n)
        .into_iter()
        .map(|mut player| {
            player.elo_state = EloState::starting_at(rating);
            player
        })
        .collect()
}

/// Deterministic tournament over `players` with the standard calculator
pub fn seeded_tournament(players: Vec<Player>, seed: u64) -> Tournament {
    Tournament::start(
        players,
        PairingScheduler::with_seed(seed).with_first_match_id(1),
        Box::new(EloCalculator::standard()),
        false,
    )
    .unwrap()
}

/// Fresh scratch directory under the system temp dir
pub fn scratch_dir(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("americano-{}-{}", label, uuid::Uuid::new_v4()))
}

/// Play every match of the next round with `score`
pub fn play_round(tournament: &mut Tournament, store: &dyn PlayerStore, score: [u32; 2]) {
    let match_ids: Vec<u64> = tournament
        .next_round()
        .unwrap()
        .matches
        .iter()
        .map(|m| m.id)
        .collect();

    for match_id in match_ids {
        tournament.update_score(match_id, 0, score[0]).unwrap();
        tournament.update_score(match_id, 1, score[1]).unwrap();
        tournament.finish_match(match_id, store).unwrap();
    }
}

/// In-memory store that counts writes
#[derive(Debug, Default)]
pub struct CountingStore {
    inner: InMemoryStore,
    player_saves: AtomicUsize,
    match_saves: AtomicUsize,
}

impl CountingStore {
    pub fn with_players(players: Vec<Player>) -> Self {
        Self {
            inner: InMemoryStore::with_players(players),
            ..Self::default()
        }
    }

    pub fn player_saves(&self) -> usize {
        self.player_saves.load(Ordering::SeqCst)
    }

    pub fn match_saves(&self) -> usize {
        self.match_saves.load(Ordering::SeqCst)
    }
}

impl PlayerStore for CountingStore {
    fn load_players(&self) -> Result<Vec<Player>> {
        self.inner.load_players()
    }

    fn save_players(&self, players: &[Player]) -> Result<()> {
        self.player_saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save_players(players)
    }

    fn load_matches(&self) -> Result<Vec<MatchRecord>> {
        self.inner.load_matches()
    }

    fn save_matches(&self, matches: &[MatchRecord]) -> Result<()> {
        self.match_saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save_matches(matches)
    }
}

/// Store whose reads succeed but every write fails
#[derive(Debug, Default)]
pub struct ReadOnlyStore {
    inner: InMemoryStore,
}

impl ReadOnlyStore {
    pub fn with_players(players: Vec<Player>) -> Self {
        Self {
            inner: InMemoryStore::with_players(players),
        }
    }
}

impl PlayerStore for ReadOnlyStore {
    fn load_players(&self) -> Result<Vec<Player>> {
        self.inner.load_players()
    }

    fn save_players(&self, _players: &[Player]) -> Result<()> {
        Err(AmericanoError::Storage {
            message: "store is read-only".to_string(),
        }
        .into())
    }

    fn load_matches(&self) -> Result<Vec<MatchRecord>> {
        self.inner.load_matches()
    }

    fn save_matches(&self, _matches: &[MatchRecord]) -> Result<()> {
        Err(AmericanoError::Storage {
            message: "store is read-only".to_string(),
        }
        .into())
    }
}

/// Store whose writes fail on demand
///
/// `player_saves_allowed` counts successful player writes before they start
/// failing; `match_save_failures` counts match writes rejected before they
/// start succeeding.
#[derive(Debug)]
pub struct FaultyStore {
    inner: InMemoryStore,
    player_saves_allowed: AtomicUsize,
    match_save_failures: AtomicUsize,
}

impl FaultyStore {
    pub fn with_players(players: Vec<Player>) -> Self {
        Self {
            inner: InMemoryStore::with_players(players),
            player_saves_allowed: AtomicUsize::new(usize::MAX),
            match_save_failures: AtomicUsize::new(0),
        }
    }

    /// Reject the next `count` match writes
    pub fn failing_match_saves(self, count: usize) -> Self {
        self.match_save_failures.store(count, Ordering::SeqCst);
        self
    }

    /// Accept only `count` more player writes
    pub fn allowing_player_saves(self, count: usize) -> Self {
        self.player_saves_allowed.store(count, Ordering::SeqCst);
        self
    }

    fn rejected(what: &str) -> anyhow::Error {
        AmericanoError::Storage {
            message: format!("{} write rejected", what),
        }
        .into()
    }
}

impl PlayerStore for FaultyStore {
    fn load_players(&self) -> Result<Vec<Player>> {
        self.inner.load_players()
    }

    fn save_players(&self, players: &[Player]) -> Result<()> {
        let allowed = self
            .player_saves_allowed
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1));
        if allowed.is_err() {
            return Err(Self::rejected("player"));
        }
        self.inner.save_players(players)
    }

    fn load_matches(&self) -> Result<Vec<MatchRecord>> {
        self.inner.load_matches()
    }

    fn save_matches(&self, matches: &[MatchRecord]) -> Result<()> {
        let failing = self
            .match_save_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1));
        if failing.is_ok() {
            return Err(Self::rejected("match"));
        }
        self.inner.save_matches(matches)
    }
}
