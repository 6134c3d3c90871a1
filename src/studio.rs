//! Application controller tying grid, assignments, selection and rendering
//!
//! [`Studio`] owns all mutable state of one editing session. Nothing is
//! global, so independent studios can live side by side. The UI layer calls
//! the `on_*` and `pointer_*` methods and decides itself when to call
//! [`Studio::render`] again; the studio never redraws on its own.
//!
//! Progress messages and change notifications go to a [`StudioObserver`].

use tracing::info;

use crate::assign::{AssignError, AssignmentStore, ExportFile, ImportError, ImportFile};
use crate::grid::{can_generate, find_cell_at, Cell, CellId, GridCache, GridParams, Size};
use crate::project::{GroupListing, Project};
use crate::renderer::{render_scene, Frame, SceneConfig, SceneInput};
use crate::view::{Selection, ViewOptions, ViewTransform};

/// Counters shown in the status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub assigned_zones: usize,
    pub total_zones: usize,
    pub used_cells: usize,
    pub total_cells: usize,
    pub selected_cells: usize,
}

/// Result of clicking a cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The cell was added to the selection
    Selected(CellId),
    /// The cell was removed from the selection
    Deselected(CellId),
    /// The cell belongs to a zone and was left alone
    Owned { cell: CellId, zone: String },
    /// Empty space was clicked and the selection cleared
    Cleared,
    /// Empty space was clicked with shift held; nothing changed
    Missed,
}

/// Receives notifications from a [`Studio`]. All methods default to no-ops.
pub trait StudioObserver {
    /// A short human readable status line
    fn status(&mut self, _message: &str) {}

    /// Assignments were added, removed, undone, reset or imported
    fn assignments_changed(&mut self, _stats: &Stats) {}

    /// Grid parameters changed; every held cell id is now invalid
    fn grid_changed(&mut self, _params: &GridParams) {}
}

/// Observer that forwards status lines to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl StudioObserver for LogObserver {
    fn status(&mut self, message: &str) {
        info!("{}", message);
    }
}

pub struct Studio {
    project: Project,
    params: GridParams,
    grid: GridCache,
    store: AssignmentStore,
    selection: Selection,
    options: ViewOptions,
    canvas: Size,
    observer: Box<dyn StudioObserver>,
}

impl Studio {
    /// Start a session on `project` with its grid defaults and a canvas the
    /// size of the map
    pub fn new(project: Project) -> Self {
        let params = project.grid_defaults();
        let canvas = project.map_size();
        Self {
            project,
            params,
            grid: GridCache::new(),
            store: AssignmentStore::new(),
            selection: Selection::new(),
            options: ViewOptions::default(),
            canvas,
            observer: Box::new(LogObserver),
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn StudioObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_canvas(mut self, canvas: Size) -> Self {
        self.canvas = canvas;
        self
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn store(&self) -> &AssignmentStore {
        &self.store
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn options(&self) -> ViewOptions {
        self.options
    }

    pub fn set_options(&mut self, options: ViewOptions) {
        self.options = options;
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    pub fn set_canvas(&mut self, canvas: Size) {
        self.canvas = canvas;
    }

    pub fn grid_params(&self) -> GridParams {
        self.params
    }

    /// Replace the grid parameters and drop the cached grid.
    ///
    /// Cell ids are renumbered, so the selection, hover and focused zone are
    /// cleared as well. Assignments keep their ids.
    pub fn set_grid_params(&mut self, params: GridParams) {
        self.params = params;
        self.grid.invalidate();
        self.selection.clear();
        self.selection.hovered = None;
        self.selection.focused_zone = None;
        self.observer.grid_changed(&params);
    }

    /// Show or hide a layer; returns false for an unknown layer
    pub fn set_layer_visible(&mut self, layer_id: &str, visible: bool) -> bool {
        let Some(layer) = self.project.layer_mut(layer_id) else {
            return false;
        };
        layer.visible = visible;
        let message = format!(
            "Layer \"{}\" {}",
            layer.name,
            if visible { "shown" } else { "hidden" }
        );
        self.observer.status(&message);
        true
    }

    /// Set a layer's opacity, clamped to `0..=1`. Returns false for an
    /// unknown layer or a non-finite opacity.
    pub fn set_layer_opacity(&mut self, layer_id: &str, opacity: f64) -> bool {
        if !opacity.is_finite() {
            return false;
        }
        let Some(layer) = self.project.layer_mut(layer_id) else {
            return false;
        };
        layer.opacity = Some(opacity.clamp(0.0, 1.0));
        true
    }

    /// Current cells, regenerated if the parameters changed
    pub fn cells(&mut self) -> &[Cell] {
        self.grid.cells(&self.params, self.project.map_size())
    }

    /// The transform used for both drawing and pointer input
    pub fn transform(&self) -> ViewTransform {
        ViewTransform::fit(self.canvas, self.project.map_size())
    }

    /// The cell under a canvas pixel, if any
    pub fn cell_at_pixel(&mut self, px: f64, py: f64) -> Option<CellId> {
        let point = self.transform().pixel_to_map(px, py);
        let cells = self.grid.cells(&self.params, self.project.map_size());
        find_cell_at(point.x, point.y, cells).map(|c| c.id)
    }

    /// Handle a click at a canvas pixel
    pub fn pointer_click(&mut self, px: f64, py: f64, shift: bool) -> ClickOutcome {
        match self.cell_at_pixel(px, py) {
            Some(cell) => self.on_cell_click(cell),
            None if shift => ClickOutcome::Missed,
            None => {
                self.clear_selection();
                ClickOutcome::Cleared
            }
        }
    }

    /// Handle pointer movement; returns true when the hovered cell changed
    pub fn pointer_move(&mut self, px: f64, py: f64) -> bool {
        let cell = self.cell_at_pixel(px, py);
        self.on_cell_hover(cell)
    }

    /// Toggle a cell in the selection. Cells owned by a zone are reported
    /// instead of selected.
    pub fn on_cell_click(&mut self, cell: CellId) -> ClickOutcome {
        if let Some(zone) = self.store.zone_for_cell(cell) {
            let zone = zone.to_string();
            let message = format!(
                "Cell #{} → \"{}\"",
                cell,
                self.project.zone_name(&zone)
            );
            self.observer.status(&message);
            return ClickOutcome::Owned { cell, zone };
        }

        let selected = self.selection.toggle(cell);
        self.selection.focused_zone = None;
        let message = format!("Selected: {} cells", self.selection.len());
        self.observer.status(&message);
        if selected {
            ClickOutcome::Selected(cell)
        } else {
            ClickOutcome::Deselected(cell)
        }
    }

    /// Set the hovered cell; returns true when it changed
    pub fn on_cell_hover(&mut self, cell: Option<CellId>) -> bool {
        if self.selection.hovered == cell {
            return false;
        }
        self.selection.hovered = cell;
        true
    }

    /// Assign explicit cells to a zone
    pub fn on_assign_request<I>(
        &mut self,
        zone_id: &str,
        group_id: &str,
        cells: I,
    ) -> Result<bool, AssignError>
    where
        I: IntoIterator<Item = CellId>,
    {
        let changed = self.store.assign(zone_id, group_id, cells)?;
        if changed {
            let count = self
                .store
                .get_assignment(zone_id)
                .map(|a| a.cell_ids.len())
                .unwrap_or(0);
            let message = format!(
                "✓ \"{}\" assigned ({} cells)",
                self.project.zone_name(zone_id),
                count
            );
            self.observer.status(&message);
            self.notify_assignments();
        }
        Ok(changed)
    }

    /// Assign the current selection to a project zone and clear the
    /// selection. The group is taken from the project.
    pub fn assign_selection(&mut self, zone_id: &str) -> Result<bool, AssignError> {
        let group_id = self
            .project
            .zone(zone_id)
            .map(|z| z.group.id.clone())
            .ok_or_else(|| AssignError::UnknownZone(zone_id.to_string()))?;
        let cells: Vec<CellId> = self.selection.cells.iter().copied().collect();
        let changed = self.on_assign_request(zone_id, &group_id, cells)?;
        self.selection.clear();
        Ok(changed)
    }

    /// Remove a zone's assignment; returns false when it had none
    pub fn on_unassign_request(&mut self, zone_id: &str) -> bool {
        if !self.store.unassign(zone_id) {
            return false;
        }
        let message = format!("\"{}\" unassigned", self.project.zone_name(zone_id));
        self.observer.status(&message);
        self.notify_assignments();
        true
    }

    /// Undo the most recent assignment, returning the zone it removed
    pub fn on_undo_request(&mut self) -> Option<String> {
        let zone = self.store.undo_last()?;
        let message = format!("Undo: \"{}\" unassigned", self.project.zone_name(&zone));
        self.observer.status(&message);
        self.notify_assignments();
        Some(zone)
    }

    /// Drop every assignment, the undo history and the selection
    pub fn on_reset_request(&mut self) {
        self.store.reset_all();
        self.selection.clear();
        self.observer.status("All assignments reset");
        self.notify_assignments();
    }

    /// Select all cells of an assigned zone and focus it
    pub fn highlight_zone(&mut self, zone_id: &str) -> bool {
        let Some(assignment) = self.store.get_assignment(zone_id) else {
            return false;
        };
        self.selection.cells = assignment.cell_ids.clone();
        self.selection.focused_zone = Some(zone_id.to_string());
        let message = format!(
            "\"{}\": {} cells",
            self.project.zone_name(zone_id),
            assignment.cell_ids.len()
        );
        self.observer.status(&message);
        true
    }

    /// Unassign the focused zone and clear the selection
    pub fn delete_focused_zone(&mut self) -> Option<String> {
        let zone = self.selection.focused_zone.clone()?;
        self.on_unassign_request(&zone);
        self.selection.clear();
        Some(zone)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.observer.status("Selection cleared");
    }

    pub fn stats(&mut self) -> Stats {
        let total_cells = self.cells().len();
        Stats {
            assigned_zones: self.store.assigned_count(),
            total_zones: self.project.total_zones(),
            used_cells: self.store.used_cell_count(),
            total_cells,
            selected_cells: self.selection.len(),
        }
    }

    /// Zone panel contents for a search filter
    pub fn zone_list(&self, filter: &str) -> Vec<GroupListing> {
        self.project.zone_list(filter, &self.store)
    }

    pub fn export(&self) -> ExportFile {
        ExportFile {
            project_name: self.project.name.clone(),
            grid_params: self.params,
            assignments: self.store.export(),
        }
    }

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        let json = self.export().to_json()?;
        info!(zones = self.store.assigned_count(), "exported assignments");
        Ok(json)
    }

    /// Load an assignments file.
    ///
    /// Nothing changes unless the whole file is accepted. Grid parameters
    /// present in the file are merged over the current ones and must still
    /// produce a grid; assignments present in the file replace the current
    /// ones and reset the undo history. Returns the number of assigned zones
    /// afterwards.
    pub fn import_json(&mut self, content: &str) -> Result<usize, ImportError> {
        let file = ImportFile::from_json(content)?;

        let params = file.grid_params.map(|patch| patch.apply_to(&self.params));
        if let Some(params) = params {
            let map = self.project.map_size();
            if !can_generate(map.width, map.height, &params) {
                return Err(ImportError::InvalidGridParams(params));
            }
        }

        if let Some(data) = &file.assignments {
            self.store.import(data)?;
        }
        if let Some(params) = params {
            self.set_grid_params(params);
        }

        let count = self.store.assigned_count();
        let message = format!("Imported {} zone assignments", count);
        self.observer.status(&message);
        self.notify_assignments();
        Ok(count)
    }

    /// Draw the current state
    pub fn render(&mut self, config: &SceneConfig) -> Frame {
        let cells = self.grid.cells(&self.params, self.project.map_size());
        let input = SceneInput {
            project: &self.project,
            cells,
            store: &self.store,
            selection: &self.selection,
            options: self.options,
            canvas: self.canvas,
        };
        render_scene(&input, config)
    }

    fn notify_assignments(&mut self) {
        let stats = self.stats();
        self.observer.assignments_changed(&stats);
    }
}
