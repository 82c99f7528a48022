//! Team splits for four-player groups and the per-tournament pairing cycle
//!
//! Four labelled players A, B, C, D can be split into two teams in exactly
//! three ways. The first time a group meets, the split with the fewest prior
//! partnerships is chosen; afterwards the group steps through the three
//! splits in order.

use crate::types::{Match, PlayerId};
use std::collections::HashMap;

/// Positions (into the four active players) forming each team
pub type Split = [[usize; 2]; 2];

/// The three splits: AB|CD, AC|BD, AD|BC
pub const SPLITS: [Split; 3] = [[[0, 1], [2, 3]], [[0, 2], [1, 3]], [[0, 3], [1, 2]]];

/// Order-independent identity of a four-player group
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupKey([PlayerId; 4]);

impl GroupKey {
    pub fn new(ids: [&PlayerId; 4]) -> Self {
        let mut sorted = ids.map(|id| id.clone());
        sorted.sort();
        Self(sorted)
    }

    pub fn ids(&self) -> &[PlayerId; 4] {
        &self.0
    }
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join(","))
    }
}

/// Times `a` and `b` have been teammates in `history`
pub fn count_partnerships(history: &[Match], a: &str, b: &str) -> usize {
    history.iter().filter(|m| m.has_partnership(a, b)).count()
}

/// Total prior partnerships of both teams of a split
pub fn split_partnerships(history: &[Match], ids: [&PlayerId; 4], split: &Split) -> usize {
    split
        .iter()
        .map(|team| count_partnerships(history, ids[team[0]], ids[team[1]]))
        .sum()
}

/// Next split index to serve, per four-player group
///
/// Owned by one tournament; clear it when a new tournament starts.
#[derive(Debug, Clone, Default)]
pub struct PairingHistory {
    next_index: HashMap<GroupKey, usize>,
}

impl PairingHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored next index, `None` on a first encounter
    pub fn next_index(&self, key: &GroupKey) -> Option<usize> {
        self.next_index.get(key).copied()
    }

    /// Remember that `served` was used, so the following one comes next
    pub fn record(&mut self, key: GroupKey, served: usize) {
        self.next_index.insert(key, (served + 1) % SPLITS.len());
    }

    pub fn clear(&mut self) {
        self.next_index.clear();
    }

    pub fn len(&self) -> usize {
        self.next_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.next_index.is_empty()
    }
}
