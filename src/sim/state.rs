//! Board state and core simulation types

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::damage::BossHealth;
use super::grid::{CellCoord, Grid};
use crate::config::{BoardConfig, ConfigError};

/// Tile type identifier, drawn from `0..config.type_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileType(pub u8);

/// A placed tile. The id is stable across moves, so presentation can key
/// sprites on it; the grid slot it occupies is the single source of truth
/// for where it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: u32,
    pub tile_type: TileType,
}

/// Turn-resolution state. While `Resolving`, placement and lift requests are
/// rejected; in an async host this flag is the mutual-exclusion guard around
/// the whole turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Resolving,
}

/// Why the board was cleared and repopulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResetReason {
    /// Every cell was occupied at a settlement point
    BoardFull,
    /// The spawn policy found no safe placement
    NoSafeSpawn,
    /// Boss health reached zero
    Win,
    /// The host asked for a fresh session
    Requested,
}

/// Ordered notifications for the presentation layer, drained after every
/// sim call. The sim never consumes its own events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new tile entered the board (layout or pressure spawn)
    TileSpawned {
        id: u32,
        tile_type: TileType,
        cell: CellCoord,
    },
    /// An existing tile was committed to a cell by a placement request
    TilePlaced { id: u32, cell: CellCoord },
    /// A tile left the board (cluster clear or reset)
    TileDestroyed { id: u32, cell: CellCoord },
    /// A cluster resolved: cells cleared, damage applied
    ClusterResolved {
        cells: Vec<CellCoord>,
        damage: u32,
        chain_index: u32,
    },
    /// Boss health reached zero
    Win,
    /// The board was cleared, boss health restored, starting layout respawned
    BoardReset { reason: ResetReason },
    /// The turn finished and the resolver returned to idle
    TurnSettled { exploded: bool },
}

/// Intro-layout hint: which tile the scripted demo loop should wiggle, and
/// where it should pretend to drag it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntroHint {
    pub hint_cell: CellCoord,
    pub target_cell: CellCoord,
}

/// Complete board simulation state.
///
/// The grid, boss pool and RNG are private: occupancy changes only through
/// the turn resolver so the resolving guard can actually guard.
#[derive(Debug, Clone)]
pub struct BoardState {
    pub(super) config: BoardConfig,
    /// Run seed for reproducibility
    pub seed: u64,
    pub(super) grid: Grid,
    pub(super) boss: BossHealth,
    pub(super) rng: Pcg32,
    pub(super) phase: Phase,
    pub(super) chain_index: u32,
    pub(super) score: u64,
    pub(super) events: VecDeque<GameEvent>,
    pub(super) intro_hint: Option<IntroHint>,
    /// True while a lifted tile is off the board awaiting `place_lifted`.
    /// Board mutation is rejected until the lift closes, so its origin cell
    /// stays free for the restore path.
    pub(super) lift_open: bool,
    next_tile_id: u32,
}

impl BoardState {
    /// Build a board from a validated config and spawn the starting layout.
    /// Bad configs fail here, before any turn can start.
    pub fn new(config: BoardConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::new(&config);
        let boss = BossHealth::new(config.boss_max_health);
        let mut state = Self {
            config,
            seed,
            grid,
            boss,
            rng: Pcg32::seed_from_u64(seed),
            phase: Phase::Idle,
            chain_index: 0,
            score: 0,
            events: VecDeque::new(),
            intro_hint: None,
            lift_open: false,
            next_tile_id: 1,
        };
        state.spawn_starting_layout();
        Ok(state)
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn boss(&self) -> BossHealth {
        self.boss
    }

    pub fn is_resolving(&self) -> bool {
        self.phase == Phase::Resolving
    }

    pub fn is_board_full(&self) -> bool {
        self.grid.is_full()
    }

    /// Clusters resolved so far in the current (or last) turn, for UI.
    pub fn chain_index(&self) -> u32 {
        self.chain_index
    }

    /// Total damage dealt this session, for UI.
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Hint cells for the scripted intro demonstration, when the intro
    /// layout is active.
    pub fn intro_hint(&self) -> Option<IntroHint> {
        self.intro_hint
    }

    /// Take all pending events, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain(..).collect()
    }

    pub(super) fn push_event(&mut self, event: GameEvent) {
        self.events.push_back(event);
    }

    pub(super) fn alloc_tile_id(&mut self) -> u32 {
        let id = self.next_tile_id;
        self.next_tile_id += 1;
        id
    }

    /// Mint a tile and place it. Internal: layout and pressure spawns only.
    pub(super) fn spawn_tile(&mut self, tile_type: TileType, cell: CellCoord) -> Tile {
        let tile = Tile {
            id: self.alloc_tile_id(),
            tile_type,
        };
        self.grid.place(tile, cell);
        self.push_event(GameEvent::TileSpawned {
            id: tile.id,
            tile_type,
            cell,
        });
        tile
    }
}
