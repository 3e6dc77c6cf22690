//! Grid store: cell occupancy and coordinate transforms
//!
//! The grid is the sole owner of occupancy state. Other components read it
//! through accessors and mutate it only from the turn resolver; the backing
//! array is never exposed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Tile, TileType};
use crate::config::BoardConfig;

/// Integer cell coordinates. Signed so neighbor arithmetic never underflows;
/// the grid validates range at the access points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i32,
    pub y: i32,
}

impl CellCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// 4-connected neighborhood offsets
pub const NEIGHBORS_4: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Fixed-size board of optionally occupied cells, row-major storage.
#[derive(Debug, Clone)]
pub struct Grid {
    width: u32,
    height: u32,
    cell_size: f32,
    origin: Vec2,
    cells: Vec<Option<Tile>>,
}

impl Grid {
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            cell_size: config.cell_size,
            origin: config.origin,
            cells: vec![None; (config.width * config.height) as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn in_bounds(&self, cell: CellCoord) -> bool {
        cell.x >= 0 && (cell.x as u32) < self.width && cell.y >= 0 && (cell.y as u32) < self.height
    }

    #[inline]
    fn index(&self, cell: CellCoord) -> usize {
        (cell.y as u32 * self.width + cell.x as u32) as usize
    }

    /// World position of a cell's center.
    pub fn cell_to_world(&self, cell: CellCoord) -> Vec2 {
        self.origin + Vec2::new(cell.x as f32, cell.y as f32) * self.cell_size
    }

    /// Nearest cell for a world position, or `None` when it falls outside the
    /// board or is not finite. Ties round half-away-from-zero (`f32::round`),
    /// so a point exactly between two cells snaps toward the
    /// farther-from-origin cell; this is the snap rule for placement at cell
    /// boundaries.
    pub fn world_to_cell(&self, world: Vec2) -> Option<CellCoord> {
        let f = (world - self.origin) / self.cell_size;
        // NaN would otherwise saturate to 0 in the cast and snap to a cell
        if !(f.x.is_finite() && f.y.is_finite()) {
            return None;
        }
        let cell = CellCoord::new(f.x.round() as i32, f.y.round() as i32);
        self.in_bounds(cell).then_some(cell)
    }

    /// True iff the cell is on the board and unoccupied.
    pub fn is_empty(&self, cell: CellCoord) -> bool {
        self.in_bounds(cell) && self.cells[self.index(cell)].is_none()
    }

    pub fn tile_at(&self, cell: CellCoord) -> Option<Tile> {
        if !self.in_bounds(cell) {
            return None;
        }
        self.cells[self.index(cell)]
    }

    pub fn type_at(&self, cell: CellCoord) -> Option<TileType> {
        self.tile_at(cell).map(|t| t.tile_type)
    }

    /// Write a tile into a cell. Overwrites without checking so the turn-loop
    /// hot path stays branch-free; placing into an occupied cell is a caller
    /// contract violation, enforced at the `request_placement` boundary.
    pub fn place(&mut self, tile: Tile, cell: CellCoord) {
        debug_assert!(self.in_bounds(cell));
        let idx = self.index(cell);
        self.cells[idx] = Some(tile);
    }

    /// Empty a cell, returning the tile that occupied it.
    pub fn clear(&mut self, cell: CellCoord) -> Option<Tile> {
        if !self.in_bounds(cell) {
            return None;
        }
        let idx = self.index(cell);
        self.cells[idx].take()
    }

    /// True iff every cell is occupied (board-overflow terminal check).
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// All cells in scan order: x ascending, then y ascending. This order is
    /// what makes best-match tie-breaking deterministic.
    pub fn iter_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        (0..self.width as i32)
            .flat_map(move |x| (0..self.height as i32).map(move |y| CellCoord::new(x, y)))
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.iter_cells().filter(|&c| self.is_empty(c))
    }

    pub fn occupied_cells(&self) -> impl Iterator<Item = (CellCoord, Tile)> + '_ {
        self.iter_cells()
            .filter_map(|c| self.tile_at(c).map(|t| (c, t)))
    }
}
