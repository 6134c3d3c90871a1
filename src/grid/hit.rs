//! Point location on the diamond grid

use super::types::Cell;

/// Check whether `(px, py)` lies inside the diamond of `cell`.
///
/// The diamond is the unit L1 ball in coordinates normalized by the half
/// width and half height, so edges and corners count as inside.
pub fn hit_test(px: f64, py: f64, cell: &Cell) -> bool {
    let dx = (px - cell.cx).abs() / (cell.w / 2.0);
    let dy = (py - cell.cy).abs() / (cell.h / 2.0);
    dx + dy <= 1.0
}

/// Find the first cell, in sequence order, whose diamond contains the point
pub fn find_cell_at<'a>(mx: f64, my: f64, cells: &'a [Cell]) -> Option<&'a Cell> {
    cells.iter().find(|cell| hit_test(mx, my, cell))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::types::CellId;

    fn cell(id: u32, x: f64, y: f64) -> Cell {
        Cell {
            id: CellId(id),
            x,
            y,
            w: 70.0,
            h: 35.0,
            cx: x + 35.0,
            cy: y + 17.5,
        }
    }

    #[test]
    fn test_center_hits() {
        let c = cell(1, 0.0, 0.0);
        assert!(hit_test(35.0, 17.5, &c));
    }

    #[test]
    fn test_corners_hit_and_bbox_corners_miss() {
        let c = cell(1, 0.0, 0.0);
        assert!(hit_test(35.0, 0.0, &c));
        assert!(hit_test(70.0, 17.5, &c));
        assert!(!hit_test(0.0, 0.0, &c));
        assert!(!hit_test(70.0, 35.0, &c));
    }

    #[test]
    fn test_outside_bbox_misses() {
        let c = cell(1, 0.0, 0.0);
        assert!(!hit_test(-0.1, 17.5, &c));
        assert!(!hit_test(35.0, 35.1, &c));
    }

    #[test]
    fn test_find_returns_first_match() {
        let cells = [cell(1, 0.0, 0.0), cell(2, 0.0, 0.0), cell(3, 70.0, 0.0)];
        assert_eq!(find_cell_at(35.0, 17.5, &cells).map(|c| c.id), Some(CellId(1)));
        assert_eq!(find_cell_at(105.0, 17.5, &cells).map(|c| c.id), Some(CellId(3)));
        assert!(find_cell_at(500.0, 500.0, &cells).is_none());
    }

    #[test]
    fn test_zero_size_cell_never_hits() {
        let mut c = cell(1, 0.0, 0.0);
        c.w = 0.0;
        c.h = 0.0;
        assert!(!hit_test(c.cx, c.cy, &c));
    }
}
