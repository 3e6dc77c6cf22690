//! Deterministic board simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable scan order (x ascending, then y ascending)
//! - No rendering or platform dependencies
//!
//! Hosts drive the sim through `BoardState::request_placement` (and the
//! lift/place pair for drags) and drain `GameEvent`s after every call.

pub mod damage;
pub mod grid;
pub mod matcher;
pub mod spawn;
pub mod state;
pub mod turn;

pub use damage::BossHealth;
pub use grid::{CellCoord, Grid, NEIGHBORS_4};
pub use spawn::{SpawnMode, SpawnPick};
pub use state::{BoardState, GameEvent, IntroHint, Phase, ResetReason, Tile, TileType};
pub use turn::{LiftError, LiftedTile, PlacementError, PlacementResult, TurnOutcome};
