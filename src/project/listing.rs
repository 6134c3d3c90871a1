//! Filtered zone catalog for the zone panel

use super::Project;
use crate::assign::AssignmentStore;

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneListing {
    pub id: String,
    pub name: String,
    pub assigned: bool,
    pub cell_count: usize,
}

/// One group with the zones that survived the filter
#[derive(Debug, Clone, PartialEq)]
pub struct GroupListing {
    pub id: String,
    pub name: String,
    pub color: String,
    pub zones: Vec<ZoneListing>,
}

impl GroupListing {
    /// Assigned zones among the listed ones
    pub fn assigned_count(&self) -> usize {
        self.zones.iter().filter(|z| z.assigned).count()
    }
}

impl Project {
    /// List zones grouped by group, keeping those whose name, id or group
    /// name contains `filter` (case-insensitive). Groups left without any
    /// zone are omitted. An empty filter keeps everything.
    pub fn zone_list(&self, filter: &str, store: &AssignmentStore) -> Vec<GroupListing> {
        let needle = filter.to_lowercase();
        let matches = |text: &str| text.to_lowercase().contains(&needle);

        self.groups
            .iter()
            .filter_map(|group| {
                let group_hit = needle.is_empty() || matches(&group.name);
                let zones: Vec<ZoneListing> = group
                    .zones
                    .iter()
                    .filter(|zone| group_hit || matches(&zone.name) || matches(&zone.id))
                    .map(|zone| {
                        let cell_count = store
                            .get_assignment(&zone.id)
                            .map(|a| a.cell_ids.len())
                            .unwrap_or(0);
                        ZoneListing {
                            id: zone.id.clone(),
                            name: zone.name.clone(),
                            assigned: store.is_assigned(&zone.id),
                            cell_count,
                        }
                    })
                    .collect();
                if zones.is_empty() {
                    return None;
                }
                Some(GroupListing {
                    id: group.id.clone(),
                    name: group.name.clone(),
                    color: group.color.clone(),
                    zones,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::assign::AssignmentStore;
    use crate::grid::CellId;
    use crate::project::Project;

    fn project() -> Project {
        Project::from_json(
            r##"{"name": "p", "mapW": 100, "mapH": 100, "groups": [
                {"id": "sangam", "name": "Sangam-dong", "color": "#E57373", "zones": [
                    {"id": "sangam_B1", "name": "DMC Media City"},
                    {"id": "sangam_B2", "name": "World Cup Park"}
                ]},
                {"id": "hapjeong", "name": "Hapjeong-dong", "color": "#64B5F6", "zones": [
                    {"id": "hapjeong_A", "name": "Station Plaza"}
                ]}
            ]}"##,
        )
        .unwrap()
    }

    #[test]
    fn test_empty_filter_lists_everything() {
        let listing = project().zone_list("", &AssignmentStore::new());
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].zones.len(), 2);
    }

    #[test]
    fn test_filter_by_zone_name() {
        let listing = project().zone_list("park", &AssignmentStore::new());
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].zones[0].id, "sangam_B2");
    }

    #[test]
    fn test_filter_by_group_name_keeps_all_zones() {
        let listing = project().zone_list("HAPJEONG", &AssignmentStore::new());
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].zones.len(), 1);
    }

    #[test]
    fn test_assigned_counts() {
        let mut store = AssignmentStore::new();
        store
            .assign("sangam_B1", "sangam", [CellId(1), CellId(2)])
            .unwrap();
        let listing = project().zone_list("", &store);
        assert_eq!(listing[0].assigned_count(), 1);
        assert_eq!(listing[0].zones[0].cell_count, 2);
        assert!(!listing[0].zones[1].assigned);
    }
}
