//! Isocity Studio - zone assignment over an isometric city map
//!
//! This library provides the diamond grid engine, the zone assignment store,
//! the shared screen/map transform and an SVG scene renderer, tied together
//! by the [`Studio`] controller.
//!
//! # Example
//!
//! ```rust
//! use isocity_studio::{CellId, Project, SceneConfig, Studio};
//!
//! let project = Project::from_json(r##"{
//!     "name": "Mapo", "mapW": 140, "mapH": 70,
//!     "groups": [{"id": "g1", "name": "Sangam", "color": "#E57373",
//!                 "zones": [{"id": "z1", "name": "Media City"}]}]
//! }"##).unwrap();
//!
//! let mut studio = Studio::new(project);
//! studio.on_assign_request("z1", "g1", [CellId(1), CellId(2)]).unwrap();
//!
//! let frame = studio.render(&SceneConfig::default());
//! assert!(frame.svg.contains("<svg"));
//! assert!(frame.svg.contains("Media City"));
//! ```

pub mod assign;
pub mod grid;
pub mod project;
pub mod renderer;
pub mod studio;
pub mod theme;
pub mod view;

pub use assign::{AssignError, AssignmentStore, ExportFile, ImportError, ImportFile};
pub use grid::{Cell, CellId, GridParams, Point, Size};
pub use project::{Project, ProjectError};
pub use renderer::{Frame, SceneConfig};
pub use studio::{ClickOutcome, LogObserver, Stats, Studio, StudioObserver};
pub use theme::{Theme, ThemeError};
pub use view::{Selection, ViewOptions, ViewTransform};

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors that can occur while driving a studio from files
#[derive(Debug, Error)]
pub enum StudioError {
    #[error("project error: {0}")]
    Project(#[from] ProjectError),

    #[error("theme error: {0}")]
    Theme(#[from] ThemeError),

    #[error("import error: {0}")]
    Import(#[from] ImportError),

    #[error("assign error: {0}")]
    Assign(#[from] AssignError),

    #[error("failed to write export: {0}")]
    Export(#[from] serde_json::Error),

    #[error("failed to access '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StudioError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Load a project directory and, if given, an assignments file on top of it
pub fn open(project_dir: &Path, assignments: Option<&Path>) -> Result<Studio, StudioError> {
    let project = Project::load(project_dir)?;
    let mut studio = Studio::new(project);
    if let Some(path) = assignments {
        let content = fs::read_to_string(path).map_err(|e| StudioError::io(path, e))?;
        studio.import_json(&content)?;
    }
    Ok(studio)
}
