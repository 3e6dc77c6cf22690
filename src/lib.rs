//! Chain Burst - resolution engine for a tile-placement chain puzzle
//!
//! Core modules:
//! - `sim`: Deterministic board simulation (grid, matching, damage, turn loop)
//! - `config`: Tunable board/damage configuration with fail-fast validation
//!
//! The sim is pure and headless: rendering, input capture, and audio live in
//! the host. The host feeds placement requests in and drains `GameEvent`s out.

pub mod config;
pub mod sim;

pub use config::{BoardConfig, ConfigError, DamageCurve, MatchRule};
pub use sim::{
    BoardState, BossHealth, CellCoord, GameEvent, Grid, IntroHint, LiftError, LiftedTile, Phase,
    PlacementError, PlacementResult, ResetReason, SpawnMode, Tile, TileType, TurnOutcome,
};

/// Engine default constants
pub mod consts {
    /// Board width in cells
    pub const BOARD_WIDTH: u32 = 5;
    /// Board height in cells
    pub const BOARD_HEIGHT: u32 = 5;

    /// World-space size of one cell
    pub const CELL_SIZE: f32 = 1.2;
    /// World-space position of cell (0, 0)
    pub const ORIGIN_X: f32 = -2.4;
    pub const ORIGIN_Y: f32 = -2.4;

    /// Damage dealt by a threshold-sized cluster before curve scaling
    pub const BASE_DAMAGE: u32 = 100;
    /// Added to the chain multiplier per chained resolution past the first
    pub const CHAIN_STEP: f32 = 0.5;

    /// Minimum cluster size that counts as a match
    pub const MATCH_THRESHOLD: usize = 3;
    /// Number of distinct tile types
    pub const TYPE_COUNT: u8 = 3;

    /// Boss health pool
    pub const BOSS_MAX_HEALTH: u32 = 1000;

    /// Tiles dropped by the random starting layout
    pub const INITIAL_TILES: u32 = 10;

    /// Pressure spawns after a neutral (no-explosion) turn
    pub const NEUTRAL_PRESSURE_SPAWNS: u32 = 2;
    /// Pressure spawns after each chained resolution
    pub const CHAINED_PRESSURE_SPAWNS: u32 = 1;

    /// Seconds between per-tile clear cues. Presentation pacing only; the
    /// logical clear is atomic.
    pub const EXPLODE_DELAY: f32 = 0.05;
}
