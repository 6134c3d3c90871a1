//! Grid engine: diamond cell generation and hit testing
//!
//! This module is pure geometry. It knows nothing about zones, selection or
//! rendering.

pub mod engine;
pub mod hit;
pub mod types;

pub use engine::{
    can_generate, generate, position_count, GridCache, GridKey, GRID_PADDING, MAX_GRID_CELLS,
};
pub use hit::{find_cell_at, hit_test};
pub use types::*;
