//! Turn resolver: placement requests, the chain loop, terminal outcomes
//!
//! One turn runs synchronously from an accepted placement back to `Idle`.
//! Each loop iteration's logical mutation (clear, damage, spawn) fully
//! completes before the next iteration reads the grid; presentation pacing
//! happens host-side off the event stream and never gates correctness.

use thiserror::Error;

use super::grid::CellCoord;
use super::spawn::SpawnMode;
use super::state::{BoardState, GameEvent, IntroHint, Phase, ResetReason, Tile, TileType};
use super::{damage, matcher, spawn};
use crate::consts;

/// Rejected placement request. The board is untouched on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("a turn is currently resolving")]
    Resolving,
    #[error("a lifted tile is outstanding")]
    TileLifted,
    #[error("target cell is outside the board")]
    InvalidCell,
    #[error("target cell is occupied")]
    Occupied,
}

/// Rejected lift request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LiftError {
    #[error("a turn is currently resolving")]
    Resolving,
    #[error("a lifted tile is outstanding")]
    TileLifted,
    #[error("cell is outside the board")]
    InvalidCell,
    #[error("cell is empty")]
    EmptyCell,
}

/// A tile taken off the board for a pending drag. Must be handed back to
/// `place_lifted`, which always ends with the tile on the board again
/// (committed at the target or restored to `origin`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a lifted tile must be passed back to place_lifted"]
pub struct LiftedTile {
    pub tile: Tile,
    pub origin: CellCoord,
}

/// How `place_lifted` disposed of the tile.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementResult {
    /// Placed at the target; the turn resolved
    Committed(TurnOutcome),
    /// Target was unusable; the tile went back to its origin cell
    Restored(PlacementError),
}

/// Summary of one resolved turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TurnOutcome {
    /// Whether the placement triggered at least one cluster
    pub exploded: bool,
    /// Clusters resolved this turn
    pub clusters: u32,
    /// Total damage dealt this turn
    pub damage: u32,
    /// Terminal outcome, when one fired
    pub reset: Option<ResetReason>,
}

/// Fixed opening board, indexed `[y][x]`; -1 marks a gap. Dragging the hint
/// tile at (0, 2) into the gap at (2, 2) produces the first explosion.
const INTRO_LAYOUT: [[i8; 5]; 5] = [
    [-1, -1, -1, -1, -1],
    [-1, 1, 0, 2, -1],
    [0, 0, -1, 0, -1],
    [-1, 1, 0, 2, -1],
    [-1, -1, -1, -1, -1],
];
const INTRO_HINT: (i32, i32) = (0, 2);
const INTRO_TARGET: (i32, i32) = (2, 2);

impl BoardState {
    /// Materialize a tile of `tile_type` at `cell` and resolve the turn.
    /// Rejections are typed and leave all state untouched.
    pub fn request_placement(
        &mut self,
        tile_type: TileType,
        cell: CellCoord,
    ) -> Result<TurnOutcome, PlacementError> {
        self.check_placeable(cell)?;
        self.spawn_tile(tile_type, cell);
        Ok(self.resolve_turn(cell))
    }

    /// Take the tile at `cell` off the board for a drag. At most one lift is
    /// open at a time, and all other board mutation is rejected until
    /// `place_lifted` closes it; the lift brackets the board the way
    /// `Resolving` brackets a turn.
    pub fn lift(&mut self, cell: CellCoord) -> Result<LiftedTile, LiftError> {
        if self.phase == Phase::Resolving {
            return Err(LiftError::Resolving);
        }
        if self.lift_open {
            return Err(LiftError::TileLifted);
        }
        if !self.grid.in_bounds(cell) {
            return Err(LiftError::InvalidCell);
        }
        match self.grid.clear(cell) {
            Some(tile) => {
                self.lift_open = true;
                Ok(LiftedTile { tile, origin: cell })
            }
            None => Err(LiftError::EmptyCell),
        }
    }

    /// Drop a lifted tile at `target`. On a usable target the tile is
    /// committed and the turn resolves; otherwise the tile snaps back to its
    /// origin cell. Either way the lift is closed, never orphaned.
    pub fn place_lifted(&mut self, lifted: LiftedTile, target: CellCoord) -> PlacementResult {
        self.lift_open = false;
        match self.check_placeable(target) {
            Ok(()) => {
                self.grid.place(lifted.tile, target);
                self.push_event(GameEvent::TilePlaced {
                    id: lifted.tile.id,
                    cell: target,
                });
                PlacementResult::Committed(self.resolve_turn(target))
            }
            Err(reason) => {
                self.grid.place(lifted.tile, lifted.origin);
                self.push_event(GameEvent::TilePlaced {
                    id: lifted.tile.id,
                    cell: lifted.origin,
                });
                PlacementResult::Restored(reason)
            }
        }
    }

    /// Host-requested restart. A turn is never cancellable from outside, but
    /// the resolver runs synchronously, so from the host's view this always
    /// finds the board between turns; the phase flag is forced back to idle
    /// atomically with the reset regardless.
    pub fn restart(&mut self) {
        self.phase = Phase::Idle;
        self.lift_open = false;
        self.chain_index = 0;
        self.reset_board(ResetReason::Requested);
    }

    fn check_placeable(&self, cell: CellCoord) -> Result<(), PlacementError> {
        if self.phase == Phase::Resolving {
            return Err(PlacementError::Resolving);
        }
        if self.lift_open {
            return Err(PlacementError::TileLifted);
        }
        if !self.grid.in_bounds(cell) {
            return Err(PlacementError::InvalidCell);
        }
        if !self.grid.is_empty(cell) {
            return Err(PlacementError::Occupied);
        }
        Ok(())
    }

    /// One full turn: initial match at the placed cell, then the chain loop
    /// until the board is stable or a terminal outcome fires.
    fn resolve_turn(&mut self, cell: CellCoord) -> TurnOutcome {
        self.phase = Phase::Resolving;
        self.chain_index = 0;

        let threshold = self.config.match_threshold;
        let rule = self.config.match_rule;
        let mut outcome = TurnOutcome::default();

        match matcher::match_at(&self.grid, cell, threshold, rule) {
            None => {
                // Neutral turn: pressure the board, then the overflow check.
                // A failed spawn is already board exhaustion, so it fires the
                // reset instead of the full-board check.
                log::debug!("neutral turn at ({}, {})", cell.x, cell.y);
                if self.apply_pressure(consts::NEUTRAL_PRESSURE_SPAWNS, SpawnMode::AvoidMatch) {
                    if self.grid.is_full() {
                        outcome.reset = Some(ResetReason::BoardFull);
                    }
                } else {
                    outcome.reset = Some(ResetReason::NoSafeSpawn);
                }
            }
            Some(mut cluster) => {
                outcome.exploded = true;
                loop {
                    self.chain_index += 1;
                    let dealt = damage::final_damage(&self.config, cluster.len(), self.chain_index);
                    self.boss.apply_damage(dealt);
                    self.score += u64::from(dealt);
                    outcome.clusters += 1;
                    outcome.damage += dealt;
                    log::info!(
                        "chain {}: cluster of {} for {} damage, boss at {}",
                        self.chain_index,
                        cluster.len(),
                        dealt,
                        self.boss.current()
                    );
                    self.clear_cluster(&cluster, dealt);

                    if !self.boss.is_defeated()
                        && !self.apply_pressure(
                            consts::CHAINED_PRESSURE_SPAWNS,
                            SpawnMode::PreferMatch,
                        )
                    {
                        outcome.reset = Some(ResetReason::NoSafeSpawn);
                        break;
                    }
                    if self.grid.is_full() {
                        outcome.reset = Some(ResetReason::BoardFull);
                        break;
                    }
                    match matcher::best_match(&self.grid, threshold, rule) {
                        Some(next) => cluster = next,
                        None => break,
                    }
                }
            }
        }

        // Terminal outcomes are mutually exclusive per turn; a game-over
        // reset invalidates board state, so it outranks a pending win.
        if let Some(reason) = outcome.reset {
            self.reset_board(reason);
        } else if self.boss.is_defeated() {
            self.push_event(GameEvent::Win);
            outcome.reset = Some(ResetReason::Win);
            self.reset_board(ResetReason::Win);
        }

        self.push_event(GameEvent::TurnSettled {
            exploded: outcome.exploded,
        });
        self.phase = Phase::Idle;
        outcome
    }

    /// Clear every cell of a resolved cluster. Logically atomic; the host
    /// paces the matching destroy cues off the event stream.
    fn clear_cluster(&mut self, cells: &[CellCoord], dealt: u32) {
        self.push_event(GameEvent::ClusterResolved {
            cells: cells.to_vec(),
            damage: dealt,
            chain_index: self.chain_index,
        });
        for &cell in cells {
            if let Some(tile) = self.grid.clear(cell) {
                self.push_event(GameEvent::TileDestroyed { id: tile.id, cell });
            }
        }
    }

    /// Run `count` pressure spawns under `mode`. False when the policy is
    /// exhausted before all spawns landed.
    fn apply_pressure(&mut self, count: u32, mode: SpawnMode) -> bool {
        for _ in 0..count {
            let Some(pick) = spawn::pick_spawn(&self.grid, &self.config, mode, &mut self.rng)
            else {
                log::debug!("pressure spawn exhausted ({mode:?})");
                return false;
            };
            self.spawn_tile(pick.tile_type, pick.cell);
        }
        true
    }

    /// Full reset: clear the grid, restore boss health, respawn the starting
    /// layout. Synchronous from the resolver's point of view.
    fn reset_board(&mut self, reason: ResetReason) {
        log::info!("board reset: {reason:?}");
        let occupied: Vec<_> = self.grid.occupied_cells().collect();
        for (cell, tile) in occupied {
            self.grid.clear(cell);
            self.push_event(GameEvent::TileDestroyed { id: tile.id, cell });
        }
        self.boss.restore();
        self.score = 0;
        self.push_event(GameEvent::BoardReset { reason });
        self.spawn_starting_layout();
    }

    /// Opening board: the fixed intro map when it fits the config, a random
    /// drop otherwise.
    pub(super) fn spawn_starting_layout(&mut self) {
        self.intro_hint = None;
        let intro_fits =
            self.config.width >= 5 && self.config.height >= 5 && self.config.type_count >= 3;
        if self.config.use_intro_layout && intro_fits {
            self.spawn_intro_layout();
        } else {
            self.spawn_random_layout();
        }
    }

    /// The intro map, centered on boards larger than 5x5.
    fn spawn_intro_layout(&mut self) {
        let ox = (self.config.width as i32 - 5) / 2;
        let oy = (self.config.height as i32 - 5) / 2;
        for (y, row) in INTRO_LAYOUT.iter().enumerate() {
            for (x, &t) in row.iter().enumerate() {
                if t < 0 {
                    continue;
                }
                self.spawn_tile(
                    TileType(t as u8),
                    CellCoord::new(ox + x as i32, oy + y as i32),
                );
            }
        }
        self.intro_hint = Some(IntroHint {
            hint_cell: CellCoord::new(ox + INTRO_HINT.0, oy + INTRO_HINT.1),
            target_cell: CellCoord::new(ox + INTRO_TARGET.0, oy + INTRO_TARGET.1),
        });
    }

    /// Unconstrained random drop of `initial_tiles` tiles.
    fn spawn_random_layout(&mut self) {
        for _ in 0..self.config.initial_tiles {
            let Some(pick) =
                spawn::pick_spawn(&self.grid, &self.config, SpawnMode::Unconstrained, &mut self.rng)
            else {
                break;
            };
            self.spawn_tile(pick.tile_type, pick.cell);
        }
    }
}
