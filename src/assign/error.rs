//! Error types for the assignment store

use thiserror::Error;

use crate::grid::{CellId, GridParams};

/// Errors raised when recording an assignment
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssignError {
    /// A requested cell already belongs to another zone
    #[error("cell {cell} requested for zone '{zone}' already belongs to zone '{owner}'")]
    CellConflict {
        zone: String,
        cell: CellId,
        owner: String,
    },

    /// The zone is not part of the loaded project
    #[error("unknown zone '{0}'")]
    UnknownZone(String),
}

impl AssignError {
    pub fn conflict(zone: impl Into<String>, cell: CellId, owner: impl Into<String>) -> Self {
        Self::CellConflict {
            zone: zone.into(),
            cell,
            owner: owner.into(),
        }
    }
}

/// Errors raised while importing an assignments file.
///
/// An import that fails leaves the store exactly as it was.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The file is not valid JSON or does not have the expected shape
    #[error("invalid assignments file: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two zones in the file claim the same cell
    #[error("cell {cell} is claimed by both '{first}' and '{second}'")]
    CellConflict {
        cell: CellId,
        first: String,
        second: String,
    },

    /// The merged grid parameters cannot produce a usable grid
    #[error(
        "unusable grid parameters: cell {}x{}, offset ({}, {})",
        .0.cell_w,
        .0.cell_h,
        .0.off_x,
        .0.off_y
    )]
    InvalidGridParams(GridParams),
}

impl ImportError {
    pub fn conflict(cell: CellId, first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::CellConflict {
            cell,
            first: first.into(),
            second: second.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_conflict_display() {
        let err = AssignError::conflict("sangam_B1", CellId(12), "sangam_B2");
        let msg = err.to_string();
        assert!(msg.contains("cell 12"));
        assert!(msg.contains("sangam_B2"));
    }

    #[test]
    fn test_import_parse_display() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ImportError::from(json_err);
        assert!(err.to_string().starts_with("invalid assignments file"));
    }

    #[test]
    fn test_import_conflict_display() {
        let err = ImportError::conflict(CellId(3), "a", "b");
        assert_eq!(err.to_string(), "cell 3 is claimed by both 'a' and 'b'");
    }

    #[test]
    fn test_invalid_grid_params_display() {
        let err = ImportError::InvalidGridParams(GridParams::new(0.0, 35.0));
        assert_eq!(
            err.to_string(),
            "unusable grid parameters: cell 0x35, offset (0, 0)"
        );
    }
}
