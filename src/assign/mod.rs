//! Assignment store: which zone owns which cells
//!
//! The store is independent of the grid. It deals in [`CellId`]s only and
//! never checks that they exist in the current grid generation.
//!
//! [`CellId`]: crate::grid::CellId

pub mod codec;
pub mod error;
pub mod store;

pub use codec::{AssignmentsData, ExportFile, ExportedAssignment, GridParamsPatch, ImportFile};
pub use error::{AssignError, ImportError};
pub use store::{Assignment, AssignmentStore};
