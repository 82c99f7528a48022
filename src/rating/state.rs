//! Rating state transitions and history summaries

use crate::types::{EloHistoryEntry, EloState, MatchId, PROVISIONAL_MATCHES};
use chrono::{DateTime, Utc};

/// Number of recent history entries used for form display
pub const DEFAULT_TREND_WINDOW: usize = 5;

impl EloState {
    /// New state after one rated match
    pub fn updated(
        &self,
        delta: i32,
        match_id: MatchId,
        timestamp: DateTime<Utc>,
        provisional_matches: u32,
    ) -> EloState {
        let current = self.current + delta;
        let matches_for_rating = self.matches_for_rating + 1;

        let (peak, peak_date) = if current > self.peak {
            (current, Some(timestamp))
        } else {
            (self.peak, self.peak_date)
        };

        let mut history = Vec::with_capacity(self.history.len() + 1);
        history.extend_from_slice(&self.history);
        history.push(EloHistoryEntry {
            date: timestamp,
            rating: current,
            change: delta,
            match_id,
        });

        EloState {
            current,
            peak,
            peak_date,
            history,
            provisional: matches_for_rating < provisional_matches,
            matches_for_rating,
        }
    }

    /// Mean change over the last [`DEFAULT_TREND_WINDOW`] matches
    pub fn trend(&self) -> i32 {
        trend(&self.history, DEFAULT_TREND_WINDOW)
    }
}

/// Apply one rating change, producing the next state
pub fn apply_rating_update(
    state: &EloState,
    delta: i32,
    match_id: MatchId,
    timestamp: DateTime<Utc>,
) -> EloState {
    state.updated(delta, match_id, timestamp, PROVISIONAL_MATCHES)
}

/// Mean of `change` over the last `last_n` entries, 0 when empty
///
/// Halves round toward positive infinity, so a mean of -13.5 reports -13.
pub fn trend(history: &[EloHistoryEntry], last_n: usize) -> i32 {
    let window = last_n.min(history.len());
    if window == 0 {
        return 0;
    }

    let recent = &history[history.len() - window..];
    let total: i64 = recent.iter().map(|entry| i64::from(entry.change)).sum();
    (total as f64 / window as f64 + 0.5).floor() as i32
}
