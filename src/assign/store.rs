//! Bidirectional zone ↔ cell index with a linear undo stack.
//!
//! Every cell is owned by at most one zone. The forward map (zone → cells)
//! and the reverse index (cell → zone) are always updated together, and
//! [`AssignmentStore::assign`] refuses cell sets that overlap another zone.
//!
//! The undo stack records one zone id per successful `assign`. Undo simply
//! unassigns the popped zone; entries are never merged, so a zone assigned
//! twice needs two undos. There is no redo.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use super::codec::{AssignmentsData, ExportedAssignment};
use super::error::{AssignError, ImportError};
use crate::grid::CellId;

/// Cells occupied by one zone
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub cell_ids: BTreeSet<CellId>,
    pub group_id: String,
}

impl Assignment {
    /// Cell on which the zone label is drawn: the median of the sorted ids
    pub fn label_cell(&self) -> Option<CellId> {
        self.cell_ids.iter().nth(self.cell_ids.len() / 2).copied()
    }
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentStore {
    assignments: BTreeMap<String, Assignment>,
    cell_to_zone: BTreeMap<CellId, String>,
    undo_stack: Vec<String>,
}

impl AssignmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `cell_ids` to `zone_id`, replacing any previous assignment.
    ///
    /// Returns `Ok(false)` without touching anything when the set is empty.
    /// Fails when a cell is owned by a different zone; cells already owned
    /// by `zone_id` itself are fine since they are freed first.
    pub fn assign<I>(&mut self, zone_id: &str, group_id: &str, cell_ids: I) -> Result<bool, AssignError>
    where
        I: IntoIterator<Item = CellId>,
    {
        let cell_ids: BTreeSet<CellId> = cell_ids.into_iter().collect();
        if cell_ids.is_empty() {
            return Ok(false);
        }

        for cell in &cell_ids {
            if let Some(owner) = self.cell_to_zone.get(cell) {
                if owner != zone_id {
                    return Err(AssignError::conflict(zone_id, *cell, owner.clone()));
                }
            }
        }

        self.unassign(zone_id);
        for cell in &cell_ids {
            self.cell_to_zone.insert(*cell, zone_id.to_string());
        }
        info!(zone = zone_id, cells = cell_ids.len(), "assigned zone");
        self.assignments.insert(
            zone_id.to_string(),
            Assignment {
                cell_ids,
                group_id: group_id.to_string(),
            },
        );
        self.undo_stack.push(zone_id.to_string());
        Ok(true)
    }

    /// Remove a zone's assignment. Returns false when it had none.
    ///
    /// The undo stack is left alone; undoing a zone that was unassigned in
    /// the meantime is a no-op.
    pub fn unassign(&mut self, zone_id: &str) -> bool {
        let Some(assignment) = self.assignments.remove(zone_id) else {
            return false;
        };
        for cell in &assignment.cell_ids {
            self.cell_to_zone.remove(cell);
        }
        debug!(zone = zone_id, "unassigned zone");
        true
    }

    /// Pop the most recent assignment and unassign that zone
    pub fn undo_last(&mut self) -> Option<String> {
        let zone_id = self.undo_stack.pop()?;
        self.unassign(&zone_id);
        Some(zone_id)
    }

    /// Clear assignments, reverse index and undo history
    pub fn reset_all(&mut self) {
        self.assignments.clear();
        self.cell_to_zone.clear();
        self.undo_stack.clear();
    }

    pub fn is_assigned(&self, zone_id: &str) -> bool {
        self.assignments.contains_key(zone_id)
    }

    pub fn get_assignment(&self, zone_id: &str) -> Option<&Assignment> {
        self.assignments.get(zone_id)
    }

    pub fn zone_for_cell(&self, cell: CellId) -> Option<&str> {
        self.cell_to_zone.get(&cell).map(|s| s.as_str())
    }

    pub fn is_cell_assigned(&self, cell: CellId) -> bool {
        self.cell_to_zone.contains_key(&cell)
    }

    /// Number of zones with an assignment
    pub fn assigned_count(&self) -> usize {
        self.assignments.len()
    }

    /// Number of cells owned by some zone
    pub fn used_cell_count(&self) -> usize {
        self.cell_to_zone.len()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Iterate assignments ordered by zone id
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Assignment)> {
        self.assignments.iter().map(|(zone, a)| (zone.as_str(), a))
    }

    /// Iterate the reverse index ordered by cell id
    pub fn cell_owners(&self) -> impl Iterator<Item = (CellId, &str)> {
        self.cell_to_zone.iter().map(|(cell, zone)| (*cell, zone.as_str()))
    }

    /// Snapshot of all assignments with ascending cell ids
    pub fn export(&self) -> AssignmentsData {
        self.assignments
            .iter()
            .map(|(zone, a)| {
                (
                    zone.clone(),
                    ExportedAssignment {
                        group_id: a.group_id.clone(),
                        cell_ids: a.cell_ids.iter().copied().collect(),
                    },
                )
            })
            .collect()
    }

    /// Replace the whole store with `data`.
    ///
    /// The data is checked for cells claimed by two zones before anything is
    /// cleared, so a rejected import leaves the store untouched. Zone and
    /// group ids are not checked against any project. Entries without cells
    /// are skipped. The undo stack starts out empty.
    pub fn import(&mut self, data: &AssignmentsData) -> Result<(), ImportError> {
        let mut owners: BTreeMap<CellId, &str> = BTreeMap::new();
        for (zone, entry) in data {
            for cell in &entry.cell_ids {
                if let Some(first) = owners.insert(*cell, zone.as_str()) {
                    if first != zone.as_str() {
                        return Err(ImportError::conflict(*cell, first, zone.clone()));
                    }
                }
            }
        }

        self.reset_all();
        for (zone, entry) in data {
            let cell_ids: BTreeSet<CellId> = entry.cell_ids.iter().copied().collect();
            if cell_ids.is_empty() {
                continue;
            }
            for cell in &cell_ids {
                self.cell_to_zone.insert(*cell, zone.clone());
            }
            self.assignments.insert(
                zone.clone(),
                Assignment {
                    cell_ids,
                    group_id: entry.group_id.clone(),
                },
            );
        }
        info!(zones = self.assignments.len(), "imported assignments");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<CellId> {
        raw.iter().copied().map(CellId).collect()
    }

    #[test]
    fn test_assign_and_query() {
        let mut store = AssignmentStore::new();
        assert!(store.assign("z1", "g", ids(&[1, 2, 3])).unwrap());
        assert!(store.is_assigned("z1"));
        assert_eq!(store.zone_for_cell(CellId(2)), Some("z1"));
        assert!(store.is_cell_assigned(CellId(3)));
        assert!(!store.is_cell_assigned(CellId(4)));
        assert_eq!(store.assigned_count(), 1);
        assert_eq!(store.used_cell_count(), 3);
        assert_eq!(store.get_assignment("z1").unwrap().group_id, "g");
    }

    #[test]
    fn test_empty_assign_is_noop() {
        let mut store = AssignmentStore::new();
        store.assign("z1", "g", ids(&[1])).unwrap();
        assert!(!store.assign("z1", "g", ids(&[])).unwrap());
        assert_eq!(store.get_assignment("z1").unwrap().cell_ids.len(), 1);
        assert_eq!(store.undo_depth(), 1);
    }

    #[test]
    fn test_reassign_frees_old_cells() {
        let mut store = AssignmentStore::new();
        store.assign("z1", "g", ids(&[1, 2])).unwrap();
        store.assign("z1", "g", ids(&[2, 3])).unwrap();
        assert!(!store.is_cell_assigned(CellId(1)));
        assert_eq!(store.zone_for_cell(CellId(3)), Some("z1"));
        assert_eq!(store.used_cell_count(), 2);
        assert_eq!(store.undo_depth(), 2);
    }

    #[test]
    fn test_conflicting_assign_is_rejected() {
        let mut store = AssignmentStore::new();
        store.assign("z1", "g", ids(&[1, 2])).unwrap();
        let err = store.assign("z2", "g", ids(&[2, 3])).unwrap_err();
        assert_eq!(err, AssignError::conflict("z2", CellId(2), "z1"));
        assert!(!store.is_assigned("z2"));
        assert!(!store.is_cell_assigned(CellId(3)));
        assert_eq!(store.undo_depth(), 1);
    }

    #[test]
    fn test_unassign_missing_is_noop() {
        let mut store = AssignmentStore::new();
        assert!(!store.unassign("nope"));
    }

    #[test]
    fn test_undo_after_manual_unassign_is_noop() {
        let mut store = AssignmentStore::new();
        store.assign("z1", "g", ids(&[1])).unwrap();
        store.unassign("z1");
        assert_eq!(store.undo_last(), Some("z1".to_string()));
        assert_eq!(store.assigned_count(), 0);
        assert_eq!(store.undo_last(), None);
    }

    #[test]
    fn test_double_assign_undoes_twice() {
        let mut store = AssignmentStore::new();
        store.assign("z1", "g", ids(&[1, 2])).unwrap();
        store.assign("z1", "g", ids(&[1, 2])).unwrap();
        assert_eq!(store.undo_depth(), 2);
        assert_eq!(store.undo_last(), Some("z1".to_string()));
        assert!(!store.is_assigned("z1"));
        assert_eq!(store.undo_last(), Some("z1".to_string()));
        assert_eq!(store.undo_last(), None);
    }

    #[test]
    fn test_reset_all() {
        let mut store = AssignmentStore::new();
        store.assign("z1", "g", ids(&[1])).unwrap();
        store.assign("z2", "g", ids(&[2])).unwrap();
        store.reset_all();
        assert_eq!(store.assigned_count(), 0);
        assert_eq!(store.used_cell_count(), 0);
        assert_eq!(store.undo_depth(), 0);
    }

    #[test]
    fn test_label_cell_is_median_id() {
        let a = Assignment {
            cell_ids: ids(&[9, 1, 5, 7]).into_iter().collect(),
            group_id: "g".into(),
        };
        // sorted [1, 5, 7, 9], index 2
        assert_eq!(a.label_cell(), Some(CellId(7)));
    }

    #[test]
    fn test_import_rejects_shared_cells() {
        let mut store = AssignmentStore::new();
        store.assign("keep", "g", ids(&[42])).unwrap();

        let mut data = AssignmentsData::new();
        data.insert(
            "a".into(),
            ExportedAssignment {
                group_id: "g".into(),
                cell_ids: ids(&[1, 2]),
            },
        );
        data.insert(
            "b".into(),
            ExportedAssignment {
                group_id: "g".into(),
                cell_ids: ids(&[2, 3]),
            },
        );
        assert!(store.import(&data).is_err());
        assert!(store.is_assigned("keep"));
        assert_eq!(store.undo_depth(), 1);
    }

    #[test]
    fn test_import_skips_empty_entries() {
        let mut store = AssignmentStore::new();
        let mut data = AssignmentsData::new();
        data.insert(
            "empty".into(),
            ExportedAssignment {
                group_id: "g".into(),
                cell_ids: vec![],
            },
        );
        store.import(&data).unwrap();
        assert!(!store.is_assigned("empty"));
    }
}
