//! Diamond grid generation and caching
//!
//! Cells are laid out as a 2:1 isometric tiling: rows are `cell_h / 2` apart
//! and every odd row is shifted right by half a cell, so the diamonds of
//! neighbouring rows interlock like bricks.
//!
//! Iteration runs [`GRID_PADDING`] rows/columns past the map on every side so
//! that offsets never open a gap at the edges. Cells are then culled by their
//! center against the map expanded by one full cell, which keeps partially
//! visible diamonds along the border.

use tracing::{debug, warn};

use super::types::{Cell, CellId, GridParams, Size};

/// Extra rows/columns generated beyond the visible map on each side
pub const GRID_PADDING: i64 = 2;

/// Upper bound on the positions a single grid may visit
pub const MAX_GRID_CELLS: f64 = 250_000.0;

/// Number of row/column positions `generate` would visit, before culling
pub fn position_count(map_w: f64, map_h: f64, params: &GridParams) -> f64 {
    let pad = GRID_PADDING as f64;
    let rows = (map_h / (params.cell_h / 2.0)).ceil() + 2.0 * pad;
    let cols = (map_w / params.cell_w).ceil() + 3.0 * pad;
    rows.max(0.0) * cols.max(0.0)
}

/// Whether `params` can produce a grid for the map: valid sizes and a
/// bounded number of cells
pub fn can_generate(map_w: f64, map_h: f64, params: &GridParams) -> bool {
    params.is_valid()
        && map_w.is_finite()
        && map_h.is_finite()
        && position_count(map_w, map_h, params) <= MAX_GRID_CELLS
}

/// Generate the diamond cells covering a `map_w × map_h` area.
///
/// The result is deterministic: ids start at 1 and increase row by row, left
/// to right. Invalid parameters (zero, negative or non-finite cell sizes)
/// and cells so small that the grid would exceed [`MAX_GRID_CELLS`]
/// produce an empty grid.
pub fn generate(map_w: f64, map_h: f64, params: &GridParams) -> Vec<Cell> {
    if !can_generate(map_w, map_h, params) {
        warn!(?params, map_w, map_h, "refusing to generate grid for degenerate parameters");
        return Vec::new();
    }

    let GridParams {
        cell_w,
        cell_h,
        off_x,
        off_y,
    } = *params;
    let row_h = cell_h / 2.0;

    let last_row = (map_h / row_h).ceil() as i64 + GRID_PADDING;
    let num_cols = (map_w / cell_w).ceil() as i64 + GRID_PADDING * 2;

    let mut cells = Vec::new();
    let mut next_id = 1u32;

    for row in -GRID_PADDING..last_row {
        let odd = row.rem_euclid(2) == 1;
        let shift = if odd { cell_w / 2.0 } else { 0.0 };

        for col in -GRID_PADDING..num_cols {
            let x = col as f64 * cell_w + shift + off_x;
            let y = row as f64 * row_h + off_y;
            let cx = x + cell_w / 2.0;
            let cy = y + cell_h / 2.0;

            let visible = cx > -cell_w
                && cx < map_w + cell_w
                && cy > -cell_h
                && cy < map_h + cell_h;
            if !visible {
                continue;
            }

            cells.push(Cell {
                id: CellId(next_id),
                x,
                y,
                w: cell_w,
                h: cell_h,
                cx,
                cy,
            });
            next_id += 1;
        }
    }

    cells
}

/// Everything a generated grid depends on
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridKey {
    pub params: GridParams,
    pub map: Size,
}

/// Holds the last generated grid and the key it was built for.
///
/// The cache is only reused when the requested key is equal to the stored
/// one, so a parameter change is picked up even without an explicit
/// [`GridCache::invalidate`] call. Owners that mutate parameters in place
/// should still invalidate, which the studio does.
#[derive(Debug, Default)]
pub struct GridCache {
    key: Option<GridKey>,
    cells: Vec<Cell>,
}

impl GridCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cells for `params` over `map`, regenerating when stale
    pub fn cells(&mut self, params: &GridParams, map: Size) -> &[Cell] {
        let key = GridKey {
            params: *params,
            map,
        };
        if self.key != Some(key) {
            self.cells = generate(map.width, map.height, params);
            self.key = Some(key);
            debug!(count = self.cells.len(), ?params, "regenerated grid");
        }
        &self.cells
    }

    /// Drop the cached grid; the next [`GridCache::cells`] call regenerates
    pub fn invalidate(&mut self) {
        self.key = None;
        self.cells.clear();
    }

    pub fn is_cached(&self) -> bool {
        self.key.is_some()
    }
}
