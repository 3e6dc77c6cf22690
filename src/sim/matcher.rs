//! Match detection: region flood fill and orthogonal line runs
//!
//! Both rules route through one overlay-aware type lookup, so the virtual
//! "what if this cell held this type" test is guaranteed to agree with the
//! real rule applied after a real placement.

use std::collections::{HashSet, VecDeque};

use super::grid::{CellCoord, Grid, NEIGHBORS_4};
use super::state::TileType;
use crate::config::MatchRule;

/// One hypothetically occupied cell layered over the grid.
type Overlay = Option<(CellCoord, TileType)>;

#[inline]
fn effective_type(grid: &Grid, overlay: Overlay, cell: CellCoord) -> Option<TileType> {
    match overlay {
        Some((oc, t)) if oc == cell => Some(t),
        _ => grid.type_at(cell),
    }
}

/// Maximal 4-connected region of `tile_type` containing `seed` (BFS).
/// The seed itself counts only if it is (effectively) of `tile_type`.
fn region(grid: &Grid, seed: CellCoord, tile_type: TileType, overlay: Overlay) -> Vec<CellCoord> {
    let mut result = Vec::with_capacity(16);
    let mut queue = VecDeque::new();
    let mut visited = HashSet::new();

    queue.push_back(seed);
    visited.insert(seed);

    while let Some(cell) = queue.pop_front() {
        if effective_type(grid, overlay, cell) != Some(tile_type) {
            continue;
        }
        result.push(cell);

        for (dx, dy) in NEIGHBORS_4 {
            let next = cell.offset(dx, dy);
            if grid.in_bounds(next) && visited.insert(next) {
                queue.push_back(next);
            }
        }
    }

    result
}

/// Horizontal and vertical runs through `origin`, each extended while
/// consecutive cells hold `tile_type` with no gaps. Each axis qualifies
/// independently at `threshold`; the result is the union of the qualifying
/// runs with the origin claimed once. Sub-threshold runs contribute nothing.
fn line(
    grid: &Grid,
    origin: CellCoord,
    tile_type: TileType,
    threshold: usize,
    overlay: Overlay,
) -> Vec<CellCoord> {
    if effective_type(grid, overlay, origin) != Some(tile_type) {
        return Vec::new();
    }

    let run = |dx: i32, dy: i32| {
        let mut cells = Vec::new();
        let mut cell = origin.offset(dx, dy);
        while grid.in_bounds(cell) && effective_type(grid, overlay, cell) == Some(tile_type) {
            cells.push(cell);
            cell = cell.offset(dx, dy);
        }
        cells
    };

    let left = run(-1, 0);
    let right = run(1, 0);
    let up = run(0, 1);
    let down = run(0, -1);

    let horizontal = left.len() + right.len() + 1;
    let vertical = up.len() + down.len() + 1;

    let mut result = Vec::new();
    if horizontal >= threshold {
        result.extend(left);
        result.push(origin);
        result.extend(right);
    }
    if vertical >= threshold {
        result.extend(up);
        if horizontal < threshold {
            result.push(origin);
        }
        result.extend(down);
    }
    result
}

fn cluster(
    grid: &Grid,
    origin: CellCoord,
    tile_type: TileType,
    threshold: usize,
    rule: MatchRule,
    overlay: Overlay,
) -> Vec<CellCoord> {
    match rule {
        MatchRule::Region => {
            let cells = region(grid, origin, tile_type, overlay);
            if cells.len() >= threshold { cells } else { Vec::new() }
        }
        MatchRule::Line => line(grid, origin, tile_type, threshold, overlay),
    }
}

/// Qualifying cluster containing the occupied cell `origin`, or `None` when
/// the cell is empty or its cluster is below threshold.
pub fn match_at(
    grid: &Grid,
    origin: CellCoord,
    threshold: usize,
    rule: MatchRule,
) -> Option<Vec<CellCoord>> {
    let tile_type = grid.type_at(origin)?;
    let cells = cluster(grid, origin, tile_type, threshold, rule, None);
    (!cells.is_empty()).then_some(cells)
}

/// Virtual-placement test: would putting `tile_type` at the empty cell
/// `origin` create a qualifying match? The grid is not mutated. For any
/// empty cell this yields exactly the cluster `match_at` would report after
/// a real placement.
pub fn would_match(
    grid: &Grid,
    origin: CellCoord,
    tile_type: TileType,
    threshold: usize,
    rule: MatchRule,
) -> bool {
    !cluster(grid, origin, tile_type, threshold, rule, Some((origin, tile_type))).is_empty()
}

/// Largest qualifying cluster on the whole board, used to continue a chain
/// after the triggering cell is gone. Scan order is x ascending then y
/// ascending; ties keep the first cluster encountered.
pub fn best_match(grid: &Grid, threshold: usize, rule: MatchRule) -> Option<Vec<CellCoord>> {
    let mut best: Option<Vec<CellCoord>> = None;
    for (cell, tile) in grid.occupied_cells() {
        let cells = cluster(grid, cell, tile.tile_type, threshold, rule, None);
        if cells.is_empty() {
            continue;
        }
        if best.as_ref().is_none_or(|b| cells.len() > b.len()) {
            best = Some(cells);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoardConfig;
    use crate::sim::state::Tile;

    fn grid_with(cells: &[(i32, i32, u8)]) -> Grid {
        let mut grid = Grid::new(&BoardConfig::default());
        for (i, &(x, y, t)) in cells.iter().enumerate() {
            grid.place(
                Tile {
                    id: i as u32,
                    tile_type: TileType(t),
                },
                CellCoord::new(x, y),
            );
        }
        grid
    }

    fn sorted(mut cells: Vec<CellCoord>) -> Vec<(i32, i32)> {
        cells.sort_by_key(|c| (c.x, c.y));
        cells.iter().map(|c| (c.x, c.y)).collect()
    }

    #[test]
    fn test_region_is_connected_pure_and_maximal() {
        // L-shaped region of type 0 plus a detached same-type cell at (4, 4)
        // and an adjacent cell of another type.
        let grid = grid_with(&[
            (1, 1, 0),
            (1, 2, 0),
            (1, 3, 0),
            (2, 3, 0),
            (2, 2, 1),
            (4, 4, 0),
        ]);
        let cells = match_at(&grid, CellCoord::new(1, 1), 3, MatchRule::Region).unwrap();
        assert_eq!(sorted(cells.clone()), vec![(1, 1), (1, 2), (1, 3), (2, 3)]);

        // purity: every member is the seed type
        for c in &cells {
            assert_eq!(grid.type_at(*c), Some(TileType(0)));
        }
        // maximality: no excluded same-type cell is 4-adjacent to the set
        let set: HashSet<_> = cells.iter().copied().collect();
        for (cell, tile) in grid.occupied_cells() {
            if tile.tile_type == TileType(0) && !set.contains(&cell) {
                for (dx, dy) in NEIGHBORS_4 {
                    assert!(!set.contains(&cell.offset(dx, dy)));
                }
            }
        }
    }

    #[test]
    fn test_region_below_threshold_is_no_match() {
        let grid = grid_with(&[(0, 0, 2), (0, 1, 2)]);
        assert_eq!(match_at(&grid, CellCoord::new(0, 0), 3, MatchRule::Region), None);
    }

    #[test]
    fn test_line_scenario_horizontal_run_of_four() {
        // (0,2),(1,2),(3,2) already type 0; placing at (2,2) joins them.
        let mut grid = grid_with(&[(0, 2, 0), (1, 2, 0), (3, 2, 0)]);
        grid.place(
            Tile { id: 9, tile_type: TileType(0) },
            CellCoord::new(2, 2),
        );
        let cells = match_at(&grid, CellCoord::new(2, 2), 3, MatchRule::Line).unwrap();
        assert_eq!(sorted(cells), vec![(0, 2), (1, 2), (2, 2), (3, 2)]);
    }

    #[test]
    fn test_line_gap_stops_the_run() {
        // gap at (2, 0): the run left of the origin must not see (0,0)/(1,0)
        let grid = grid_with(&[(0, 0, 1), (1, 0, 1), (3, 0, 1), (4, 0, 1)]);
        assert_eq!(match_at(&grid, CellCoord::new(3, 0), 3, MatchRule::Line), None);
    }

    #[test]
    fn test_line_cross_claims_intersection_once() {
        // horizontal and vertical runs both qualify through (2, 2)
        let grid = grid_with(&[
            (1, 2, 0),
            (2, 2, 0),
            (3, 2, 0),
            (2, 1, 0),
            (2, 3, 0),
        ]);
        let cells = match_at(&grid, CellCoord::new(2, 2), 3, MatchRule::Line).unwrap();
        assert_eq!(cells.len(), 5);
        assert_eq!(
            sorted(cells),
            vec![(1, 2), (2, 1), (2, 2), (2, 3), (3, 2)]
        );
    }

    #[test]
    fn test_line_failing_axis_contributes_nothing() {
        // vertical run of 3 qualifies, horizontal run of 2 must not leak in
        let grid = grid_with(&[(2, 1, 0), (2, 2, 0), (2, 3, 0), (3, 2, 0)]);
        let cells = match_at(&grid, CellCoord::new(2, 2), 3, MatchRule::Line).unwrap();
        assert_eq!(sorted(cells), vec![(2, 1), (2, 2), (2, 3)]);
    }

    #[test]
    fn test_virtual_equals_real_after_placement() {
        for rule in [MatchRule::Region, MatchRule::Line] {
            let layout = &[(0, 2, 0), (1, 2, 0), (3, 2, 0), (2, 1, 1), (2, 3, 1)];
            let grid = grid_with(layout);
            for cell in grid.empty_cells().collect::<Vec<_>>() {
                for t in 0..3u8 {
                    let virt = would_match(&grid, cell, TileType(t), 3, rule);
                    let mut real = grid.clone();
                    real.place(Tile { id: 99, tile_type: TileType(t) }, cell);
                    let matched = match_at(&real, cell, 3, rule).is_some();
                    assert_eq!(virt, matched, "rule {rule:?} cell {cell:?} type {t}");
                }
            }
        }
    }

    #[test]
    fn test_best_match_picks_largest_and_first_on_tie() {
        // a 3-region of type 1 and a 4-region of type 0
        let grid = grid_with(&[
            (0, 0, 1),
            (0, 1, 1),
            (0, 2, 1),
            (3, 0, 0),
            (3, 1, 0),
            (4, 0, 0),
            (4, 1, 0),
        ]);
        let best = best_match(&grid, 3, MatchRule::Region).unwrap();
        assert_eq!(best.len(), 4);
        assert_eq!(sorted(best), vec![(3, 0), (3, 1), (4, 0), (4, 1)]);

        // tie: two 3-regions; the one reached first in x-then-y scan wins
        let grid = grid_with(&[
            (0, 0, 1),
            (0, 1, 1),
            (0, 2, 1),
            (4, 0, 2),
            (4, 1, 2),
            (4, 2, 2),
        ]);
        let best = best_match(&grid, 3, MatchRule::Region).unwrap();
        assert_eq!(sorted(best), vec![(0, 0), (0, 1), (0, 2)]);
    }

    #[test]
    fn test_best_match_none_on_quiet_board() {
        let grid = grid_with(&[(0, 0, 0), (2, 2, 1), (4, 4, 2)]);
        assert_eq!(best_match(&grid, 3, MatchRule::Region), None);
    }
}
