//! Tournament session: drives the scheduler round by round and rates
//! finished matches through a [`RatingCalculator`]

use crate::config::AppConfig;
use crate::error::{AmericanoError, Result};
use crate::rating::{tier, tier_change, EloCalculator, RatingCalculator};
use crate::scheduler::{next_rotation_index, sit_out_count, PairingScheduler, MIN_PLAYERS};
use crate::store::{MatchRecord, PlayerStore};
use crate::tournament::summary::{
    MatchOutcome, PlayerSummary, TierChangeEvent, TournamentSummary,
};
use crate::types::{Match, MatchId, Player, PlayerId, Rating, Round};
use crate::utils::{current_timestamp, generate_tournament_id};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// One Americano session from start to end
pub struct Tournament<R: Rng = StdRng> {
    id: String,
    players: Vec<Player>,
    starting_ratings: HashMap<PlayerId, Rating>,
    rounds: Vec<Round>,
    history: Vec<Match>,
    rotation_index: usize,
    scheduler: PairingScheduler<R>,
    calculator: Box<dyn RatingCalculator>,
    ended: bool,
}

impl Tournament<StdRng> {
    /// Start a tournament with scheduler and rating settings from `config`
    pub fn from_config(players: Vec<Player>, config: &AppConfig) -> Result<Self> {
        let scheduler = PairingScheduler::from_seed_option(config.scheduler.seed);
        let calculator = EloCalculator::new(config.rating.clone())?;
        Self::start(
            players,
            scheduler,
            Box::new(calculator),
            config.scheduler.shuffle_roster,
        )
    }
}

impl<R: Rng> Tournament<R> {
    /// Start a new tournament
    ///
    /// Clears the scheduler's pairing history and, when asked, shuffles the
    /// roster once; the resulting order is the rotation ring for every round.
    pub fn start(
        mut players: Vec<Player>,
        mut scheduler: PairingScheduler<R>,
        calculator: Box<dyn RatingCalculator>,
        shuffle_roster: bool,
    ) -> Result<Self> {
        if players.len() < MIN_PLAYERS {
            return Err(AmericanoError::NotEnoughPlayers {
                required: MIN_PLAYERS,
                actual: players.len(),
            }
            .into());
        }

        let mut seen = HashSet::with_capacity(players.len());
        for player in &players {
            if !seen.insert(player.id.clone()) {
                return Err(AmericanoError::DuplicatePlayer {
                    player_id: player.id.clone(),
                }
                .into());
            }
        }

        scheduler.clear_pairing_history();
        if shuffle_roster {
            players.shuffle(scheduler.rng_mut());
        }

        let starting_ratings = players
            .iter()
            .map(|p| (p.id.clone(), p.elo_state.current))
            .collect();

        let id = generate_tournament_id();
        info!(
            tournament_id = %id,
            players = players.len(),
            courts = players.len() / 4,
            "Tournament started"
        );

        Ok(Self {
            id,
            players,
            starting_ratings,
            rounds: Vec::new(),
            history: Vec::new(),
            rotation_index: 0,
            scheduler,
            calculator,
            ended: false,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Roster in rotation order
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    /// Completed matches of this tournament, in completion order
    pub fn history(&self) -> &[Match] {
        &self.history
    }

    pub fn rotation_index(&self) -> usize {
        self.rotation_index
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn court_count(&self) -> usize {
        self.players.len() / 4
    }

    fn ensure_active(&self) -> Result<()> {
        if self.ended {
            return Err(AmericanoError::TournamentEnded {
                tournament_id: self.id.clone(),
            }
            .into());
        }
        Ok(())
    }

    /// Generate and append the next round, then advance the rotation
    pub fn next_round(&mut self) -> Result<&Round> {
        self.ensure_active()?;
        let courts = self.court_count();
        let generated = self.scheduler.generate_round(
            &self.players,
            &self.history,
            courts,
            self.rotation_index,
        )?;

        let round = Round {
            round_number: self.rounds.len() as u32 + 1,
            matches: generated.matches,
            sit_outs: generated.sit_outs,
        };
        round.validate(self.players.len())?;

        let sitting = sit_out_count(self.players.len(), courts);
        self.rotation_index = next_rotation_index(self.rotation_index, sitting, self.players.len());

        info!(
            tournament_id = %self.id,
            round = round.round_number,
            matches = round.matches.len(),
            sit_outs = round.sit_outs.len(),
            "Round generated"
        );

        self.rounds.push(round);
        self.rounds
            .last()
            .ok_or_else(|| AmericanoError::NoActiveRound.into())
    }

    fn find_match_mut(&mut self, match_id: MatchId) -> Result<&mut Match> {
        self.rounds
            .iter_mut()
            .flat_map(|round| round.matches.iter_mut())
            .find(|m| m.id == match_id)
            .ok_or_else(|| AmericanoError::MatchNotFound { match_id }.into())
    }

    /// Set one team's score on a match that has not been rated yet
    pub fn update_score(&mut self, match_id: MatchId, team_index: usize, score: u32) -> Result<()> {
        self.ensure_active()?;
        let game = self.find_match_mut(match_id)?;
        if game.completed {
            return Err(AmericanoError::MatchAlreadyRated { match_id }.into());
        }
        if team_index > 1 {
            return Err(AmericanoError::InvalidMatch {
                match_id,
                reason: format!("team index {} out of range", team_index),
            }
            .into());
        }

        game.score[team_index] = score;
        Ok(())
    }

    /// Complete a match and apply its rating changes through `store`
    ///
    /// A skipped match may be finished, which clears the skip. Finishing a
    /// match twice is rejected: rated results are final.
    ///
    /// Nothing changes locally until the store has accepted both the players
    /// and the match record. When the record is rejected the previous players
    /// are written back and the match stays open. If that restore fails too,
    /// the ratings are already stored, so the match is kept as rated.
    pub fn finish_match(&mut self, match_id: MatchId, store: &dyn PlayerStore) -> Result<MatchOutcome> {
        self.ensure_active()?;
        let game = self.find_match_mut(match_id)?;
        if game.completed {
            return Err(AmericanoError::MatchAlreadyRated { match_id }.into());
        }

        let mut finished = game.clone();
        finished.completed = true;
        finished.skipped = false;
        finished.validate()?;

        let loaded = store.load_players()?;
        let mut stored = loaded.clone();
        let participants: Vec<PlayerId> = finished.players().into_iter().cloned().collect();
        for player_id in &participants {
            if !stored.iter().any(|p| &p.id == player_id) {
                let roster_entry = self
                    .players
                    .iter()
                    .find(|p| &p.id == player_id)
                    .cloned()
                    .ok_or_else(|| AmericanoError::PlayerNotFound {
                        player_id: player_id.clone(),
                    })?;
                warn!(player_id = %player_id, "Player missing from store, adding roster entry");
                stored.push(roster_entry);
            }
        }

        let ratings: HashMap<PlayerId, Rating> = stored
            .iter()
            .filter(|p| participants.contains(&p.id))
            .map(|p| (p.id.clone(), p.elo_state.current))
            .collect();
        let match_counts: HashMap<PlayerId, u32> = stored
            .iter()
            .filter(|p| participants.contains(&p.id))
            .map(|p| (p.id.clone(), p.elo_state.matches_for_rating))
            .collect();

        let deltas = self
            .calculator
            .compute_match_deltas(&finished, &ratings, &match_counts)?;

        let timestamp = current_timestamp();
        let mut tier_changes = Vec::new();
        for player in stored.iter_mut().filter(|p| participants.contains(&p.id)) {
            let delta = deltas.changes.get(&player.id).copied().unwrap_or(0);
            let before = player.elo_state.current;
            player.elo_state = self
                .calculator
                .apply_update(&player.elo_state, delta, match_id, timestamp);

            if let Some((old_tier, new_tier)) = tier_change(before, player.elo_state.current) {
                info!(
                    player_id = %player.id,
                    old_tier = %old_tier,
                    new_tier = %new_tier,
                    "Tier changed"
                );
                tier_changes.push(TierChangeEvent {
                    player_id: player.id.clone(),
                    player_name: player.name.clone(),
                    old_tier,
                    new_tier,
                });
            }
        }

        store.save_players(&stored)?;
        let record = MatchRecord {
            game: finished.clone(),
            tournament_id: self.id.clone(),
            date: timestamp,
            elo_data: deltas.clone(),
        };
        if let Err(err) = store.append_match(record) {
            match store.save_players(&loaded) {
                Ok(()) => {
                    warn!(
                        tournament_id = %self.id,
                        match_id,
                        error = %err,
                        "Match record rejected, previous ratings restored"
                    );
                }
                Err(restore_err) => {
                    warn!(
                        tournament_id = %self.id,
                        match_id,
                        error = %err,
                        restore_error = %restore_err,
                        "Match record rejected and ratings could not be restored, keeping match rated"
                    );
                    self.commit_finished(finished, &stored)?;
                }
            }
            return Err(err);
        }

        self.commit_finished(finished, &stored)?;

        info!(
            tournament_id = %self.id,
            match_id,
            mov = deltas.mov,
            "Match rated"
        );

        Ok(MatchOutcome {
            deltas,
            tier_changes,
        })
    }

    /// Mark `finished` as rated locally and copy the new ratings onto the roster
    fn commit_finished(&mut self, finished: Match, stored: &[Player]) -> Result<()> {
        for player in stored.iter().filter(|p| finished.contains(&p.id)) {
            if let Some(roster_entry) = self.players.iter_mut().find(|p| p.id == player.id) {
                roster_entry.elo_state = player.elo_state.clone();
            }
        }

        *self.find_match_mut(finished.id)? = finished.clone();
        self.history.push(finished);
        Ok(())
    }

    /// Toggle the skipped flag of an unrated match, returning the new flag
    pub fn skip_match(&mut self, match_id: MatchId) -> Result<bool> {
        self.ensure_active()?;
        let game = self.find_match_mut(match_id)?;
        if game.completed {
            return Err(AmericanoError::MatchAlreadyRated { match_id }.into());
        }

        game.skipped = !game.skipped;
        let skipped = game.skipped;
        debug!(match_id, skipped, "Match skip toggled");
        Ok(skipped)
    }

    /// Every match of the latest round is either completed or skipped
    pub fn round_complete(&self) -> bool {
        self.current_round().is_some_and(Round::is_complete)
    }

    /// Skipped matches across all rounds
    pub fn skipped_count(&self) -> usize {
        self.rounds
            .iter()
            .flat_map(|round| &round.matches)
            .filter(|m| m.skipped)
            .count()
    }

    /// End the session and report standings from the store's current ratings
    pub fn end(&mut self, store: &dyn PlayerStore) -> Result<TournamentSummary> {
        self.ensure_active()?;
        let skipped = self.skipped_count();
        if skipped > 0 {
            warn!(
                tournament_id = %self.id,
                skipped,
                "Ending tournament with skipped matches; they do not count"
            );
        }

        let stored = store.load_players()?;
        let mut standings: Vec<PlayerSummary> = self
            .players
            .iter()
            .map(|player| {
                let state = stored
                    .iter()
                    .find(|p| p.id == player.id)
                    .map(|p| &p.elo_state)
                    .unwrap_or(&player.elo_state);
                let starting_rating = self
                    .starting_ratings
                    .get(&player.id)
                    .copied()
                    .unwrap_or(self.calculator.config().starting_rating);

                PlayerSummary {
                    player_id: player.id.clone(),
                    name: player.name.clone(),
                    starting_rating,
                    final_rating: state.current,
                    change: state.current - starting_rating,
                    tier: tier(state.current),
                    trend: state.trend(),
                }
            })
            .collect();
        standings.sort_by(|a, b| b.final_rating.cmp(&a.final_rating));

        self.ended = true;
        let summary = TournamentSummary {
            tournament_id: self.id.clone(),
            rounds_played: self.rounds.len(),
            matches_completed: self.history.len(),
            matches_skipped: skipped,
            standings,
        };

        info!(
            tournament_id = %self.id,
            rounds = summary.rounds_played,
            matches = summary.matches_completed,
            "Tournament ended"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryStore;

    fn roster(n: usize) -> Vec<Player> {
        (0..n)
            .map(|i| Player::new(format!("p{}", i), format!("Player {}", i)))
            .collect()
    }

    fn seeded(players: Vec<Player>) -> Tournament {
        Tournament::start(
            players,
            PairingScheduler::with_seed(7).with_first_match_id(1),
            Box::new(EloCalculator::standard()),
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_start_requires_four_players() {
        let result = Tournament::start(
            roster(3),
            PairingScheduler::with_seed(1),
            Box::new(EloCalculator::standard()),
            false,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rounds_are_numbered_and_rotation_advances() {
        let mut tournament = seeded(roster(6));
        assert_eq!(tournament.court_count(), 1);

        let first = tournament.next_round().unwrap().clone();
        assert_eq!(first.round_number, 1);
        assert_eq!(first.sit_outs.len(), 2);
        assert_eq!(tournament.rotation_index(), 2);

        let second = tournament.next_round().unwrap();
        assert_eq!(second.round_number, 2);
        assert_eq!(second.sit_outs[0].id, "p2");
        assert_eq!(tournament.rotation_index(), 4);
    }

    #[test]
    fn test_update_score_bounds() {
        let mut tournament = seeded(roster(4));
        let match_id = tournament.next_round().unwrap().matches[0].id;

        tournament.update_score(match_id, 0, 6).unwrap();
        tournament.update_score(match_id, 1, 2).unwrap();
        assert_eq!(tournament.current_round().unwrap().matches[0].score, [6, 2]);

        assert!(tournament.update_score(match_id, 2, 1).is_err());
        assert!(tournament.update_score(999, 0, 1).is_err());
    }

    #[test]
    fn test_finish_match_rates_once() {
        let store = InMemoryStore::with_players(roster(4));
        let mut tournament = seeded(roster(4));
        let match_id = tournament.next_round().unwrap().matches[0].id;
        tournament.update_score(match_id, 0, 4).unwrap();

        let outcome = tournament.finish_match(match_id, &store).unwrap();
        assert_eq!(outcome.deltas.mov, 4);
        assert!(tournament.round_complete());
        assert_eq!(tournament.history().len(), 1);
        assert_eq!(store.load_matches().unwrap().len(), 1);

        let err = tournament.finish_match(match_id, &store).unwrap_err();
        assert_eq!(
            err.downcast_ref::<AmericanoError>(),
            Some(&AmericanoError::MatchAlreadyRated { match_id })
        );
        assert!(tournament.skip_match(match_id).is_err());
        assert!(tournament.update_score(match_id, 0, 1).is_err());
    }

    #[test]
    fn test_skip_then_finish() {
        let store = InMemoryStore::new();
        let mut tournament = seeded(roster(5));
        let match_id = tournament.next_round().unwrap().matches[0].id;

        assert!(tournament.skip_match(match_id).unwrap());
        assert_eq!(tournament.skipped_count(), 1);
        assert!(tournament.round_complete());

        tournament.update_score(match_id, 1, 3).unwrap();
        tournament.finish_match(match_id, &store).unwrap();
        let game = &tournament.current_round().unwrap().matches[0];
        assert!(game.completed);
        assert!(!game.skipped);
        assert_eq!(tournament.skipped_count(), 0);

        // Players absent from the store are added from the roster
        assert_eq!(store.load_players().unwrap().len(), 4);
    }

    #[test]
    fn test_ended_tournament_rejects_changes() {
        let store = InMemoryStore::with_players(roster(5));
        let mut tournament = seeded(roster(5));
        let match_id = tournament.next_round().unwrap().matches[0].id;
        let rotation = tournament.rotation_index();
        tournament.end(&store).unwrap();

        let ended = AmericanoError::TournamentEnded {
            tournament_id: tournament.id().to_string(),
        };
        let err = tournament.next_round().unwrap_err();
        assert_eq!(err.downcast_ref::<AmericanoError>(), Some(&ended));
        assert_eq!(tournament.rounds().len(), 1);
        assert_eq!(tournament.rotation_index(), rotation);

        let err = tournament.finish_match(match_id, &store).unwrap_err();
        assert_eq!(err.downcast_ref::<AmericanoError>(), Some(&ended));
        assert!(tournament.update_score(match_id, 0, 6).is_err());
        assert!(tournament.skip_match(match_id).is_err());
        assert!(tournament.end(&store).is_err());
        assert!(store.load_matches().unwrap().is_empty());
    }

    #[test]
    fn test_rejected_player_write_leaves_roster_unrated() {
        struct RejectingStore;

        impl PlayerStore for RejectingStore {
            fn load_players(&self) -> Result<Vec<Player>> {
                Ok(Vec::new())
            }
            fn save_players(&self, _players: &[Player]) -> Result<()> {
                Err(AmericanoError::Storage {
                    message: "disk full".to_string(),
                }
                .into())
            }
            fn load_matches(&self) -> Result<Vec<MatchRecord>> {
                Ok(Vec::new())
            }
            fn save_matches(&self, _matches: &[MatchRecord]) -> Result<()> {
                Ok(())
            }
        }

        let mut tournament = seeded(roster(4));
        let match_id = tournament.next_round().unwrap().matches[0].id;
        tournament.update_score(match_id, 0, 4).unwrap();

        assert!(tournament.finish_match(match_id, &RejectingStore).is_err());
        for player in tournament.players() {
            assert_eq!(player.elo_state.current, 1500);
            assert_eq!(player.elo_state.matches_for_rating, 0);
        }

        // A retry against a working store applies the update exactly once
        let working = InMemoryStore::new();
        tournament.finish_match(match_id, &working).unwrap();
        for player in tournament.players() {
            assert_eq!(player.elo_state.matches_for_rating, 1);
            assert_eq!(player.elo_state.current.abs_diff(1500), 28);
        }
    }
}
