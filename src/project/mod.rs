//! Project model: map size, image layers, and the group/zone catalog
//!
//! A project is loaded once and treated as read-only afterwards, apart from
//! layer visibility and opacity which the operator may toggle.

pub mod listing;
pub mod loader;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::assign::GridParamsPatch;
use crate::grid::{GridParams, Size};

pub use listing::{GroupListing, ZoneListing};
pub use loader::{FsImageResolver, ImageResolver, LayerImage};

/// File name looked up inside a project directory
pub const PROJECT_FILE: &str = "project.json";

/// Errors that can occur when loading a project
#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse project JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("zone id '{zone}' is used by both group '{first}' and group '{second}'")]
    DuplicateZone {
        zone: String,
        first: String,
        second: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    Image,
    /// Layer types this crate does not draw
    #[serde(other)]
    Other,
}

/// A background layer composited under the grid
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Layer {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: LayerKind,
    #[serde(default)]
    pub src: String,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub opacity: Option<f64>,
}

fn default_visible() -> bool {
    true
}

impl Layer {
    /// Opacity to draw with, defaulting to fully opaque
    pub fn effective_opacity(&self) -> f64 {
        self.opacity.unwrap_or(1.0).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ZoneDef {
    pub id: String,
    pub name: String,
}

/// A color-coded category of zones, e.g. a district
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    /// `#rrggbb`
    pub color: String,
    #[serde(default)]
    pub zones: Vec<ZoneDef>,
}

/// A zone together with the group it belongs to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneRef<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub group: &'a Group,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub map_w: f64,
    pub map_h: f64,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub groups: Vec<Group>,
    #[serde(default)]
    grid_defaults: Option<GridParamsPatch>,
    #[serde(skip)]
    images: HashMap<String, LayerImage>,
    /// zone id → (group index, zone index)
    #[serde(skip)]
    zone_index: HashMap<String, (usize, usize)>,
}

impl Project {
    /// Parse a project from JSON. Layer images are not resolved.
    pub fn from_json(content: &str) -> Result<Self, ProjectError> {
        let mut project: Project = serde_json::from_str(content)?;
        project.build_index()?;
        Ok(project)
    }

    /// Load `project.json` from `dir` and embed its image layers
    pub fn load(dir: &Path) -> Result<Self, ProjectError> {
        let path = dir.join(PROJECT_FILE);
        let content = std::fs::read_to_string(&path).map_err(|source| ProjectError::Io {
            path: path.clone(),
            source,
        })?;
        let mut project = Self::from_json(&content)?;
        project.resolve_images(&FsImageResolver::new(dir));
        Ok(project)
    }

    fn build_index(&mut self) -> Result<(), ProjectError> {
        self.zone_index.clear();
        for (gi, group) in self.groups.iter().enumerate() {
            for (zi, zone) in group.zones.iter().enumerate() {
                if let Some((prev, _)) = self.zone_index.insert(zone.id.clone(), (gi, zi)) {
                    return Err(ProjectError::DuplicateZone {
                        zone: zone.id.clone(),
                        first: self.groups[prev].id.clone(),
                        second: group.id.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Resolve a drawable image for every image layer
    pub fn resolve_images(&mut self, resolver: &dyn ImageResolver) {
        self.images.clear();
        for layer in &self.layers {
            if layer.kind != LayerKind::Image {
                continue;
            }
            if let Some(image) = resolver.resolve(layer) {
                self.images.insert(layer.id.clone(), image);
            }
        }
    }

    /// Attach an already resolved image to a layer
    pub fn set_image(&mut self, layer_id: impl Into<String>, image: LayerImage) {
        self.images.insert(layer_id.into(), image);
    }

    /// The image for a layer, if it is present and ready to draw
    pub fn drawable_image(&self, layer_id: &str) -> Option<&LayerImage> {
        self.images.get(layer_id).filter(|img| img.is_ready())
    }

    pub fn layer_mut(&mut self, layer_id: &str) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == layer_id)
    }

    pub fn map_size(&self) -> Size {
        Size::new(self.map_w, self.map_h)
    }

    /// Grid parameters declared by the project, over the built-in defaults
    pub fn grid_defaults(&self) -> GridParams {
        match &self.grid_defaults {
            Some(patch) => patch.apply_to(&GridParams::default()),
            None => GridParams::default(),
        }
    }

    pub fn group(&self, group_id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    pub fn zone(&self, zone_id: &str) -> Option<ZoneRef<'_>> {
        let &(gi, zi) = self.zone_index.get(zone_id)?;
        let group = &self.groups[gi];
        let zone = &group.zones[zi];
        Some(ZoneRef {
            id: &zone.id,
            name: &zone.name,
            group,
        })
    }

    /// Display name of a zone, falling back to its id for unknown zones and
    /// empty names
    pub fn zone_name<'a>(&'a self, zone_id: &'a str) -> &'a str {
        self.zone(zone_id)
            .map(|z| z.name)
            .filter(|name| !name.is_empty())
            .unwrap_or(zone_id)
    }

    /// All zones in catalog order
    pub fn zones(&self) -> impl Iterator<Item = ZoneRef<'_>> {
        self.groups.iter().flat_map(|group| {
            group.zones.iter().map(move |zone| ZoneRef {
                id: &zone.id,
                name: &zone.name,
                group,
            })
        })
    }

    pub fn total_zones(&self) -> usize {
        self.zone_index.len()
    }
}
