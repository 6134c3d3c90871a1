//! Core types for the grid engine

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a generated cell.
///
/// Ids are handed out in emission order starting at 1. They are only stable
/// for one grid generation: changing any [`GridParams`] field or the map size
/// renumbers every cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellId(pub u32);

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CellId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// A 2D point in map space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width/height pair, used for both the map and the canvas
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// One diamond tile of the generated grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub id: CellId,
    /// Bounding box top-left x
    pub x: f64,
    /// Bounding box top-left y
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Diamond center x
    pub cx: f64,
    /// Diamond center y
    pub cy: f64,
}

impl Cell {
    /// The four diamond corners: top, right, bottom, left
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.cx, self.y),
            Point::new(self.x + self.w, self.cy),
            Point::new(self.cx, self.y + self.h),
            Point::new(self.x, self.cy),
        ]
    }

    /// Check whether a point falls inside the bounding box (edges included)
    pub fn bounds_contain(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.w
            && point.y >= self.y
            && point.y <= self.y + self.h
    }
}

/// Grid geometry parameters.
///
/// Serialized with the camelCase field names used by project and export files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridParams {
    /// Diamond bounding-box width
    pub cell_w: f64,
    /// Diamond bounding-box height
    pub cell_h: f64,
    /// Global x offset
    pub off_x: f64,
    /// Global y offset
    pub off_y: f64,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            cell_w: 70.0,
            cell_h: 35.0,
            off_x: 0.0,
            off_y: 0.0,
        }
    }
}

impl GridParams {
    pub fn new(cell_w: f64, cell_h: f64) -> Self {
        Self {
            cell_w,
            cell_h,
            ..Self::default()
        }
    }

    /// Set the global offset
    pub fn with_offset(mut self, off_x: f64, off_y: f64) -> Self {
        self.off_x = off_x;
        self.off_y = off_y;
        self
    }

    /// Cell sizes must be finite and strictly positive to produce a grid
    pub fn is_valid(&self) -> bool {
        self.cell_w.is_finite()
            && self.cell_h.is_finite()
            && self.cell_w > 0.0
            && self.cell_h > 0.0
            && self.off_x.is_finite()
            && self.off_y.is_finite()
    }
}
