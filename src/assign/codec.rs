//! JSON shapes for exporting and importing assignment state
//!
//! Export files always carry every field. Import files are lenient: both
//! `gridParams` and `assignments` may be missing, individual grid fields may
//! be missing, and unknown fields are ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::ImportError;
use crate::grid::{CellId, GridParams};

/// Zone id → exported assignment, ordered by zone id
pub type AssignmentsData = BTreeMap<String, ExportedAssignment>;

/// One zone's entry in an export file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedAssignment {
    #[serde(default)]
    pub group_id: String,
    /// Ascending cell ids
    #[serde(default)]
    pub cell_ids: Vec<CellId>,
}

/// Complete export file
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub project_name: String,
    pub grid_params: GridParams,
    pub assignments: AssignmentsData,
}

impl ExportFile {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Grid parameters as found in an import file; missing fields keep their
/// current value
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridParamsPatch {
    pub cell_w: Option<f64>,
    pub cell_h: Option<f64>,
    pub off_x: Option<f64>,
    pub off_y: Option<f64>,
}

impl GridParamsPatch {
    pub fn apply_to(&self, params: &GridParams) -> GridParams {
        GridParams {
            cell_w: self.cell_w.unwrap_or(params.cell_w),
            cell_h: self.cell_h.unwrap_or(params.cell_h),
            off_x: self.off_x.unwrap_or(params.off_x),
            off_y: self.off_y.unwrap_or(params.off_y),
        }
    }
}

/// Parsed import file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportFile {
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub grid_params: Option<GridParamsPatch>,
    #[serde(default)]
    pub assignments: Option<AssignmentsData>,
}

impl ImportFile {
    pub fn from_json(content: &str) -> Result<Self, ImportError> {
        Ok(serde_json::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_file() {
        let file = ImportFile::from_json(
            r#"{
                "projectName": "Mapo",
                "gridParams": {"cellW": 60, "cellH": 30, "offX": 1, "offY": 2},
                "assignments": {"z1": {"groupId": "g1", "cellIds": [3, 1, 2]}}
            }"#,
        )
        .unwrap();
        assert_eq!(file.project_name.as_deref(), Some("Mapo"));
        let params = file.grid_params.unwrap().apply_to(&GridParams::default());
        assert_eq!(params, GridParams::new(60.0, 30.0).with_offset(1.0, 2.0));
        let entry = &file.assignments.unwrap()["z1"];
        assert_eq!(entry.group_id, "g1");
        assert_eq!(entry.cell_ids, vec![CellId(3), CellId(1), CellId(2)]);
    }

    #[test]
    fn test_missing_sections_are_allowed() {
        let file = ImportFile::from_json(r#"{"somethingElse": true}"#).unwrap();
        assert_eq!(file, ImportFile::default());
    }

    #[test]
    fn test_partial_grid_params_merge() {
        let file = ImportFile::from_json(r#"{"gridParams": {"offX": 12.5}}"#).unwrap();
        let base = GridParams::new(80.0, 40.0);
        let merged = file.grid_params.unwrap().apply_to(&base);
        assert_eq!(merged, GridParams::new(80.0, 40.0).with_offset(12.5, 0.0));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = ImportFile::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ImportError::Parse(_)));
    }

    #[test]
    fn test_wrong_shape_is_parse_error() {
        let err = ImportFile::from_json(r#"{"assignments": {"z1": {"cellIds": "oops"}}}"#)
            .unwrap_err();
        assert!(matches!(err, ImportError::Parse(_)));
    }
}
