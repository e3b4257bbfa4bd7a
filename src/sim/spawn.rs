//! Pattern-driven obstacle spawning
//!
//! A fixed 16-entry pattern of stance indices decides which tracks get
//! walled: every spawn call closes the 4 tracks NOT open for the pattern's
//! stance, then advances the pattern cursor. The cursor wraps on every call
//! regardless of pool pressure, so a starved pool only thins the pattern, it
//! never shifts it.

use crate::consts::*;
use crate::sim::state::GameState;
use crate::sim::stance::Stance;

/// Repeating spawn pattern; values index into the stance table
pub const SPAWN_PATTERN: [usize; 16] = [1, 1, 1, 1, 0, 1, 2, 1, 0, 1, 2, 2, 1, 1, 0, 1];

/// Activate one wall on each closed track of the next pattern entry, placed
/// at the far spawn depth and tagged with the pattern's stance. Tracks whose
/// pool slot cannot be acquired are skipped silently.
pub fn spawn(state: &mut GameState) {
    spawn_offset(state, 0.0);
}

fn spawn_offset(state: &mut GameState, z_offset: f32) {
    let stance = Stance::from_index(SPAWN_PATTERN[state.pattern_index]);
    state.pattern_index = (state.pattern_index + 1) % SPAWN_PATTERN.len();

    for track in 0..TRACK_COUNT {
        if stance.is_open(track) {
            continue;
        }
        let Some(wall) = state.obstacles.acquire() else {
            continue;
        };
        wall.track = track;
        wall.stance = stance;
        wall.z = SPAWN_Z + z_offset;
        wall.resolved = false;
    }
}

/// Pre-populate the tunnel after a reset: back-to-back spawn rounds at
/// progressively deeper offsets, so play starts mid-stream rather than with
/// an empty tunnel. The active-obstacle soft cap does not apply here; the
/// pool capacity alone bounds the fill.
pub fn prefill(state: &mut GameState) {
    for round in 0..PREFILL_ROUNDS {
        spawn_offset(state, -(PREFILL_SPACING * round as f32));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Config;

    fn empty_state() -> GameState {
        let mut state = GameState::new(42, &Config::default());
        state.obstacles.clear();
        state.pattern_index = 0;
        state
    }

    #[test]
    fn test_spawn_closes_four_tracks() {
        let mut state = empty_state();
        spawn(&mut state);
        assert_eq!(state.obstacles.active_count(), 4);

        // Pattern entry 0 is MID; its open tracks {0, 3} must stay clear
        let stance = Stance::from_index(SPAWN_PATTERN[0]);
        for wall in state.obstacles.iter_active() {
            assert!(!stance.is_open(wall.track));
            assert_eq!(wall.stance, stance);
            assert_eq!(wall.z, SPAWN_Z);
            assert!(!wall.resolved);
        }
    }

    #[test]
    fn test_pattern_advances_and_wraps() {
        let mut state = empty_state();
        for _ in 0..SPAWN_PATTERN.len() {
            spawn(&mut state);
        }
        assert_eq!(state.pattern_index, 0);
    }

    #[test]
    fn test_exhausted_pool_skips_silently_but_advances() {
        let mut state = empty_state();
        // 15 calls x 4 walls fill the 60-slot pool
        for _ in 0..15 {
            spawn(&mut state);
        }
        assert_eq!(state.obstacles.active_count(), OBSTACLE_POOL);

        let cursor = state.pattern_index;
        spawn(&mut state);
        assert_eq!(state.obstacles.active_count(), OBSTACLE_POOL);
        assert_eq!(state.pattern_index, (cursor + 1) % SPAWN_PATTERN.len());
    }

    #[test]
    fn test_prefill_offsets_apply_per_round() {
        let mut state = empty_state();
        prefill(&mut state);
        assert_eq!(state.obstacles.active_count(), PREFILL_ROUNDS * 4);

        // Rounds land at SPAWN_Z, SPAWN_Z - 160, ... SPAWN_Z - 160 * 11
        let mut depths: Vec<f32> = state.obstacles.iter_active().map(|w| w.z).collect();
        depths.sort_by(|a, b| a.partial_cmp(b).unwrap());
        depths.dedup();
        assert_eq!(depths.len(), PREFILL_ROUNDS);
        assert_eq!(depths[0], SPAWN_Z - PREFILL_SPACING * 11.0);
        assert_eq!(depths[PREFILL_ROUNDS - 1], SPAWN_Z);
    }
}
