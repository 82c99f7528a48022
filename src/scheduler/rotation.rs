//! Sit-out rotation over the fixed roster ring

/// Players left over once every court has four
pub fn sit_out_count(player_count: usize, court_count: usize) -> usize {
    player_count.saturating_sub(court_count * 4)
}

/// Roster positions sitting out: a wrap-around slice starting at `rotation_index`
pub fn sit_out_indices(player_count: usize, sit_out_count: usize, rotation_index: usize) -> Vec<usize> {
    if player_count == 0 {
        return Vec::new();
    }

    (0..sit_out_count.min(player_count))
        .map(|i| (rotation_index + i) % player_count)
        .collect()
}

/// Rotation index for the round after this one
pub fn next_rotation_index(rotation_index: usize, sit_out_count: usize, player_count: usize) -> usize {
    if player_count == 0 {
        return 0;
    }
    (rotation_index + sit_out_count) % player_count
}
