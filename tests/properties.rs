//! Property tests for rotation fairness, round coverage and rating arithmetic

mod fixtures;

use americano::rating::{apply_rating_update, compute_match_deltas, expected_score};
use americano::scheduler::{next_rotation_index, sit_out_count, sit_out_indices, PairingScheduler};
use americano::types::{EloState, Match, PlayerId, Rating};
use americano::utils::current_timestamp;
use proptest::prelude::*;
use std::collections::{HashMap, HashSet};

use fixtures::roster;

proptest! {
    #[test]
    fn sit_outs_are_a_distinct_wraparound_slice(
        n in 1usize..40,
        count in 0usize..8,
        rotation in 0usize..100,
    ) {
        let indices = sit_out_indices(n, count, rotation);
        prop_assert_eq!(indices.len(), count.min(n));

        let distinct: HashSet<usize> = indices.iter().copied().collect();
        prop_assert_eq!(distinct.len(), indices.len());

        for (offset, index) in indices.iter().enumerate() {
            prop_assert_eq!(*index, (rotation + offset) % n);
        }
    }

    #[test]
    fn full_cycle_sits_everyone_equally(players in 4usize..24) {
        let courts = players / 4;
        let sitting = sit_out_count(players, courts);
        let mut sat = vec![0usize; players];
        let mut rotation = 0;

        for _ in 0..players {
            for index in sit_out_indices(players, sitting, rotation) {
                sat[index] += 1;
            }
            rotation = next_rotation_index(rotation, sitting, players);
        }

        prop_assert!(sat.iter().all(|&count| count == sitting));
    }

    #[test]
    fn every_round_accounts_for_each_player_once(players in 4usize..21, seed in any::<u64>()) {
        let roster = roster(players);
        let courts = players / 4;
        let mut scheduler = PairingScheduler::with_seed(seed);
        let mut history: Vec<Match> = Vec::new();
        let mut rotation = 0;

        for _ in 0..3 {
            let round = scheduler.generate_round(&roster, &history, courts, rotation).unwrap();
            prop_assert_eq!(round.matches.len(), courts);
            prop_assert_eq!(round.sit_outs.len(), players - courts * 4);

            let mut seen: HashSet<&str> = round.sit_outs.iter().map(|p| p.id.as_str()).collect();
            for game in &round.matches {
                for id in game.players() {
                    prop_assert!(seen.insert(id.as_str()));
                }
            }
            prop_assert_eq!(seen.len(), players);

            rotation = next_rotation_index(rotation, round.sit_outs.len(), players);
            history.extend(round.matches.into_iter().map(|mut m| {
                m.completed = true;
                m
            }));
        }
    }

    #[test]
    fn expected_scores_are_complementary(a in 800.0f64..2600.0, b in 800.0f64..2600.0) {
        let sum = expected_score(a, b) + expected_score(b, a);
        prop_assert!((sum - 1.0).abs() < 1e-9);
        if a > b {
            prop_assert!(expected_score(a, b) > 0.5);
        }
    }

    #[test]
    fn equal_experience_matches_are_zero_sum(
        ratings in prop::array::uniform4(1000i32..2200),
        score in prop::array::uniform2(0u32..12),
        matches in 0u32..150,
    ) {
        let ids: Vec<PlayerId> = (0..4).map(|i| format!("p{}", i)).collect();
        let mut game = Match::new(1, [ids[0].clone(), ids[1].clone()], [ids[2].clone(), ids[3].clone()]);
        game.score = score;
        game.completed = true;

        let rating_map: HashMap<PlayerId, Rating> =
            ids.iter().cloned().zip(ratings.iter().copied()).collect();
        let counts: HashMap<PlayerId, u32> = ids.iter().map(|id| (id.clone(), matches)).collect();

        let deltas = compute_match_deltas(&game, &rating_map, &counts).unwrap();
        let total: i32 = deltas.changes.values().sum();
        prop_assert_eq!(total, 0);
        prop_assert_eq!(deltas.changes[&ids[0]], deltas.changes[&ids[1]]);
        prop_assert_eq!(deltas.changes[&ids[0]], -deltas.changes[&ids[2]]);
    }

    #[test]
    fn rating_updates_track_current_and_peak(
        start in 1000i32..2000,
        changes in prop::collection::vec(-40i32..40, 0..30),
    ) {
        let mut state = EloState::starting_at(start);
        let mut expected_peak = start;
        let mut running = start;

        for (i, change) in changes.iter().enumerate() {
            state = apply_rating_update(&state, *change, i as u64, current_timestamp());
            running += change;
            expected_peak = expected_peak.max(running);
        }

        prop_assert_eq!(state.current, running);
        prop_assert_eq!(state.peak, expected_peak);
        prop_assert_eq!(state.peak_date.is_some(), expected_peak > start);
        prop_assert_eq!(state.history.len(), changes.len());
        prop_assert_eq!(state.matches_for_rating as usize, changes.len());
        prop_assert_eq!(state.provisional, changes.len() < 20);
    }
}
