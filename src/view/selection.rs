//! UI selection state and view toggles

use std::collections::BTreeSet;

use crate::grid::CellId;

/// Cells the operator is building up before assigning them to a zone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub cells: BTreeSet<CellId>,
    pub hovered: Option<CellId>,
    /// Zone whose cells were highlighted from the zone list
    pub focused_zone: Option<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: CellId) -> bool {
        self.cells.contains(&id)
    }

    /// Add or remove a cell; returns true when the cell is now selected
    pub fn toggle(&mut self, id: CellId) -> bool {
        if self.cells.remove(&id) {
            false
        } else {
            self.cells.insert(id);
            true
        }
    }

    /// Empty the cell set and drop the focused zone. Hover is left alone.
    pub fn clear(&mut self) {
        self.cells.clear();
        self.focused_zone = None;
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Rendering toggles controlled from the side panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOptions {
    pub show_numbers: bool,
    /// Grid line opacity in `0.0..=1.0`
    pub grid_opacity: f64,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            show_numbers: true,
            grid_opacity: 0.45,
        }
    }
}

impl ViewOptions {
    pub fn with_numbers(mut self, show: bool) -> Self {
        self.show_numbers = show;
        self
    }

    /// Set the grid opacity, clamped to `0.0..=1.0`
    pub fn with_grid_opacity(mut self, opacity: f64) -> Self {
        self.grid_opacity = opacity.clamp(0.0, 1.0);
        self
    }
}
