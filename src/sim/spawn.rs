//! Pressure-spawn policy: where and what to add after a turn step
//!
//! Every mode is built on the same enumeration: empty cells x tile types,
//! each classified by the virtual-placement match test. Cost is
//! O(width * height * type_count) per call, which is fine at demo-scale
//! boards; this is the first place to optimize if the grid ever grows.

use rand::Rng;
use rand_pcg::Pcg32;

use super::grid::{CellCoord, Grid};
use super::matcher;
use super::state::TileType;
use crate::config::BoardConfig;

/// Candidate selection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnMode {
    /// Only placements that do not create an immediate match. Fails when no
    /// safe placement exists; the turn resolver treats that as board
    /// exhaustion, not an error.
    AvoidMatch,
    /// Prefer placements that do create a match; fall back to any placement
    /// (safe or not) when none would.
    PreferMatch,
    /// Any empty cell, any type, no safety test. Random starting layout only.
    Unconstrained,
}

/// A chosen placement: which type goes where.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnPick {
    pub cell: CellCoord,
    pub tile_type: TileType,
}

/// Pick one placement under `mode`, or `None` when the policy is exhausted.
/// A full board short-circuits before any candidate is enumerated.
pub fn pick_spawn(
    grid: &Grid,
    config: &BoardConfig,
    mode: SpawnMode,
    rng: &mut Pcg32,
) -> Option<SpawnPick> {
    if grid.is_full() {
        return None;
    }

    if mode == SpawnMode::Unconstrained {
        let empties: Vec<CellCoord> = grid.empty_cells().collect();
        let cell = empties[rng.random_range(0..empties.len())];
        let tile_type = TileType(rng.random_range(0..config.type_count));
        return Some(SpawnPick { cell, tile_type });
    }

    let mut safe = Vec::new();
    let mut matching = Vec::new();
    for cell in grid.empty_cells() {
        for t in 0..config.type_count {
            let tile_type = TileType(t);
            let pick = SpawnPick { cell, tile_type };
            if matcher::would_match(
                grid,
                cell,
                tile_type,
                config.match_threshold,
                config.match_rule,
            ) {
                matching.push(pick);
            } else {
                safe.push(pick);
            }
        }
    }

    let pool = match mode {
        SpawnMode::AvoidMatch => safe,
        SpawnMode::PreferMatch => {
            if matching.is_empty() {
                // unconstrained fallback over every candidate pair
                safe
            } else {
                matching
            }
        }
        SpawnMode::Unconstrained => unreachable!(),
    };

    if pool.is_empty() {
        return None;
    }
    Some(pool[rng.random_range(0..pool.len())])
}
