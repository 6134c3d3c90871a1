//! Coordinate mapping and view state

pub mod selection;
pub mod transform;

pub use selection::{Selection, ViewOptions};
pub use transform::{ViewTransform, FIT_MARGIN};
