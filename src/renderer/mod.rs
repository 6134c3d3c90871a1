//! SVG scene renderer
//!
//! Turns a project, the current grid and the assignment state into one SVG
//! frame sized to the canvas, with the map fitted by [`ViewTransform::fit`].
//!
//! [`ViewTransform::fit`]: crate::view::ViewTransform::fit

pub mod color;
pub mod config;
pub mod scene;
pub mod svg;

pub use color::Rgb;
pub use config::SceneConfig;
pub use scene::{classify, render_scene, truncate_label, CellState, Frame, SceneInput};
pub use svg::SvgBuilder;
