//! Round generation: sit-out rotation followed by team assignment
//!
//! This module owns the only mutable scheduling state, the pairing cycle
//! of each four-player group, scoped to one [`PairingScheduler`].

use crate::error::{AmericanoError, Result};
use crate::scheduler::pairing::{
    count_partnerships, split_partnerships, GroupKey, PairingHistory, SPLITS,
};
use crate::scheduler::rotation::{sit_out_count, sit_out_indices};
use crate::types::{Match, MatchId, Player, PlayerId, Team};
use crate::utils::current_timestamp;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use tracing::debug;

/// Minimum roster size for one court
pub const MIN_PLAYERS: usize = 4;

/// Matches and sitters produced for one round
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedRound {
    pub matches: Vec<Match>,
    pub sit_outs: Vec<Player>,
}

/// Americano round scheduler
///
/// Randomness is confined to the injected generator: the tie-break between
/// equally fresh first-encounter splits and the shuffle of greedy pairs.
#[derive(Debug)]
pub struct PairingScheduler<R: Rng = StdRng> {
    pairing_history: PairingHistory,
    rng: R,
    next_match_id: MatchId,
}

impl PairingScheduler<StdRng> {
    /// Scheduler seeded from the operating system
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Reproducible scheduler
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Seeded when `seed` is set, entropy otherwise
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::with_seed(seed),
            None => Self::new(),
        }
    }
}

impl Default for PairingScheduler<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> PairingScheduler<R> {
    /// Scheduler drawing from a caller-provided generator
    ///
    /// Match ids start at the current Unix time in milliseconds so they stay
    /// ordered across tournaments.
    pub fn with_rng(rng: R) -> Self {
        Self {
            pairing_history: PairingHistory::new(),
            rng,
            next_match_id: current_timestamp().timestamp_millis().max(0) as MatchId,
        }
    }

    /// Override the id given to the next generated match
    pub fn with_first_match_id(mut self, id: MatchId) -> Self {
        self.next_match_id = id;
        self
    }

    pub fn pairing_history(&self) -> &PairingHistory {
        &self.pairing_history
    }

    /// Mutable access to the generator, shared with roster shuffling
    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Forget every group's pairing cycle; call once per tournament start
    pub fn clear_pairing_history(&mut self) {
        debug!(
            groups = self.pairing_history.len(),
            "Clearing pairing history"
        );
        self.pairing_history.clear();
    }

    /// Generate the next round
    ///
    /// # Arguments
    /// * `players` - Roster in rotation-ring order
    /// * `history` - Previously completed matches of this tournament
    /// * `court_count` - Courts played simultaneously
    /// * `rotation_index` - Ring offset of the first sitter, advanced by the caller
    pub fn generate_round(
        &mut self,
        players: &[Player],
        history: &[Match],
        court_count: usize,
        rotation_index: usize,
    ) -> Result<GeneratedRound> {
        validate_roster(players, court_count)?;

        let sitting = sit_out_count(players.len(), court_count);
        let positions = sit_out_indices(players.len(), sitting, rotation_index);
        let sit_outs: Vec<Player> = positions.iter().map(|&i| players[i].clone()).collect();
        let sit_out_positions: HashSet<usize> = positions.into_iter().collect();

        let active: Vec<&Player> = players
            .iter()
            .enumerate()
            .filter(|(i, _)| !sit_out_positions.contains(i))
            .map(|(_, p)| p)
            .collect();

        debug!(
            rotation_index,
            sit_outs = ?sit_outs.iter().map(|p| p.id.as_str()).collect::<Vec<_>>(),
            active = active.len(),
            "Selected sit-outs"
        );

        let matches = if active.len() == 4 {
            let ids = [&active[0].id, &active[1].id, &active[2].id, &active[3].id];
            let split = SPLITS[self.select_split(ids, history)];
            vec![self.build_match(
                [ids[split[0][0]].clone(), ids[split[0][1]].clone()],
                [ids[split[1][0]].clone(), ids[split[1][1]].clone()],
            )]
        } else {
            self.greedy_matches(&active, history)?
        };

        Ok(GeneratedRound { matches, sit_outs })
    }

    /// Index into [`SPLITS`] for a four-player group
    fn select_split(&mut self, ids: [&PlayerId; 4], history: &[Match]) -> usize {
        let key = GroupKey::new(ids);

        let index = match self.pairing_history.next_index(&key) {
            Some(stored) => {
                debug!(group = %key, split = stored, "Continuing pairing cycle");
                stored
            }
            None if history.is_empty() => {
                debug!(group = %key, split = 0, "First encounter without history");
                0
            }
            None => {
                let scores: Vec<usize> = SPLITS
                    .iter()
                    .map(|split| split_partnerships(history, ids, split))
                    .collect();
                let min_score = scores.iter().copied().min().unwrap_or(0);
                let best: Vec<usize> = scores
                    .iter()
                    .enumerate()
                    .filter(|(_, score)| **score == min_score)
                    .map(|(i, _)| i)
                    .collect();
                let chosen = best[self.rng.random_range(0..best.len())];

                debug!(
                    group = %key,
                    scores = ?scores,
                    split = chosen,
                    "First encounter, chose least-partnered split"
                );
                chosen
            }
        };

        self.pairing_history.record(key, index);
        index
    }

    /// Greedy partner selection, then shuffled pairs face each other in order
    fn greedy_matches(&mut self, active: &[&Player], history: &[Match]) -> Result<Vec<Match>> {
        let mut used = vec![false; active.len()];
        let mut pairs: Vec<Team> = Vec::with_capacity(active.len() / 2);

        for i in 0..active.len() {
            if used[i] {
                continue;
            }

            let mut best: Option<(usize, usize)> = None;
            for j in (i + 1)..active.len() {
                if used[j] {
                    continue;
                }
                let together = count_partnerships(history, &active[i].id, &active[j].id);
                if best.map_or(true, |(_, fewest)| together < fewest) {
                    best = Some((j, together));
                }
            }

            let (partner, _) = best.ok_or_else(|| AmericanoError::UnpairedPlayer {
                player_id: active[i].id.clone(),
            })?;
            used[i] = true;
            used[partner] = true;
            pairs.push([active[i].id.clone(), active[partner].id.clone()]);
        }

        pairs.shuffle(&mut self.rng);

        let chunks = pairs.chunks_exact(2);
        if let Some(left_over) = chunks.remainder().first() {
            return Err(AmericanoError::UnpairedPlayer {
                player_id: left_over[0].clone(),
            }
            .into());
        }

        let opposing: Vec<(Team, Team)> = chunks
            .map(|teams| (teams[0].clone(), teams[1].clone()))
            .collect();
        let matches: Vec<Match> = opposing
            .into_iter()
            .map(|(a, b)| self.build_match(a, b))
            .collect();

        debug!(pairs = pairs.len(), matches = matches.len(), "Built greedy matches");
        Ok(matches)
    }

    fn build_match(&mut self, team_a: Team, team_b: Team) -> Match {
        let id = self.next_match_id;
        self.next_match_id += 1;
        Match::new(id, team_a, team_b)
    }
}

fn validate_roster(players: &[Player], court_count: usize) -> Result<()> {
    if players.len() < MIN_PLAYERS {
        return Err(AmericanoError::NotEnoughPlayers {
            required: MIN_PLAYERS,
            actual: players.len(),
        }
        .into());
    }

    if court_count == 0 || court_count * 4 > players.len() {
        return Err(AmericanoError::InvalidCourtCount {
            courts: court_count,
            players: players.len(),
        }
        .into());
    }

    let mut seen = HashSet::with_capacity(players.len());
    for player in players {
        if !seen.insert(player.id.as_str()) {
            return Err(AmericanoError::DuplicatePlayer {
                player_id: player.id.clone(),
            }
            .into());
        }
    }

    Ok(())
}
