//! Fit-to-window transform between canvas pixels and map space.
//!
//! The map is scaled uniformly to fit the canvas with a small margin and then
//! centered. Both the renderer and pointer handling must derive their
//! transform from [`ViewTransform::fit`]; computing it twice in different
//! ways makes clicks land on the wrong cell.
//!
//! ```text
//! scale = min(canvas_w / map_w, canvas_h / map_h) * FIT_MARGIN
//! pan_x = (canvas_w - map_w * scale) / 2
//! pan_y = (canvas_h - map_h * scale) / 2
//! ```

use crate::grid::{Point, Size};

/// Fraction of the available canvas the map is allowed to fill
pub const FIT_MARGIN: f64 = 0.97;

/// Uniform scale followed by a translation, map space → canvas pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl ViewTransform {
    /// Compute the transform that centers `map` inside `canvas`
    pub fn fit(canvas: Size, map: Size) -> Self {
        let scale = (canvas.width / map.width).min(canvas.height / map.height) * FIT_MARGIN;
        Self {
            scale,
            pan_x: (canvas.width - map.width * scale) / 2.0,
            pan_y: (canvas.height - map.height * scale) / 2.0,
        }
    }

    /// Identity transform (no scaling, no panning)
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }

    /// Convert canvas pixel coordinates to map coordinates
    pub fn pixel_to_map(&self, px: f64, py: f64) -> Point {
        Point {
            x: (px - self.pan_x) / self.scale,
            y: (py - self.pan_y) / self.scale,
        }
    }

    /// Convert map coordinates to canvas pixel coordinates
    pub fn map_to_pixel(&self, mx: f64, my: f64) -> Point {
        Point {
            x: mx * self.scale + self.pan_x,
            y: my * self.scale + self.pan_y,
        }
    }

    /// SVG `transform` attribute value applying this transform
    pub fn to_svg(&self) -> String {
        format!(
            "translate({} {}) scale({})",
            self.pan_x, self.pan_y, self.scale
        )
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}
