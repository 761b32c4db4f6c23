//! Station registry
//!
//! Stations are created at load time. Their neighbour and line sets are only
//! written while the network is being built.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{MetroError, Result};

/// A node in the metro network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Station {
    id: String,
    name: String,
    neighbours: BTreeSet<String>,
    lines: BTreeSet<String>,
}

impl Station {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            neighbours: BTreeSet::new(),
            lines: BTreeSet::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ids of directly connected stations, in id order
    pub fn neighbours(&self) -> impl Iterator<Item = &str> {
        self.neighbours.iter().map(String::as_str)
    }

    /// Ids of the lines serving this station, in id order
    pub fn lines(&self) -> &BTreeSet<String> {
        &self.lines
    }

    pub fn is_neighbour(&self, other: &str) -> bool {
        self.neighbours.contains(other)
    }

    pub(crate) fn record_line(&mut self, line_id: &str) {
        self.lines.insert(line_id.to_string());
    }
}

/// All stations of the network keyed by id
#[derive(Debug, Clone, Default)]
pub struct StationRegistry {
    stations: BTreeMap<String, Station>,
}

impl StationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a station; ids must be unique
    pub fn insert(&mut self, station: Station) -> Result<()> {
        if self.stations.contains_key(station.id()) {
            return Err(MetroError::duplicate("Station", station.id()));
        }
        self.stations.insert(station.id.clone(), station);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&Station> {
        self.stations
            .get(id)
            .ok_or_else(|| MetroError::not_found("Station", id))
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Result<&mut Station> {
        self.stations
            .get_mut(id)
            .ok_or_else(|| MetroError::not_found("Station", id))
    }

    /// Link two stations in both directions. Idempotent; self-links are ignored.
    pub fn add_neighbour_link(&mut self, a: &str, b: &str) -> Result<()> {
        // Both must exist before either side is touched.
        self.get(a)?;
        self.get(b)?;
        if a == b {
            return Ok(());
        }
        self.get_mut(a)?.neighbours.insert(b.to_string());
        self.get_mut(b)?.neighbours.insert(a.to_string());
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.stations.values()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(ids: &[&str]) -> StationRegistry {
        let mut stations = StationRegistry::new();
        for id in ids {
            stations
                .insert(Station::new(*id, format!("{id} Station")))
                .unwrap();
        }
        stations
    }

    #[test]
    fn test_get_unknown_station() {
        let stations = registry(&["A"]);
        let err = stations.get("B").unwrap_err();
        assert!(matches!(err, MetroError::NotFound { entity_type: "Station", .. }));
    }

    #[test]
    fn test_duplicate_station_rejected() {
        let mut stations = registry(&["A"]);
        let err = stations.insert(Station::new("A", "Again")).unwrap_err();
        assert!(matches!(err, MetroError::Duplicate { .. }));
        assert_eq!(stations.get("A").unwrap().name(), "A Station");
    }

    #[test]
    fn test_neighbour_link_is_symmetric_and_idempotent() {
        let mut stations = registry(&["A", "B"]);
        stations.add_neighbour_link("A", "B").unwrap();
        stations.add_neighbour_link("B", "A").unwrap();

        let a = stations.get("A").unwrap();
        let b = stations.get("B").unwrap();
        assert_eq!(a.neighbours().collect::<Vec<_>>(), vec!["B"]);
        assert_eq!(b.neighbours().collect::<Vec<_>>(), vec!["A"]);
        assert!(a.is_neighbour("B"));
    }

    #[test]
    fn test_neighbour_link_to_unknown_station_changes_nothing() {
        let mut stations = registry(&["A"]);
        assert!(stations.add_neighbour_link("A", "Z").is_err());
        assert_eq!(stations.get("A").unwrap().neighbours().count(), 0);
    }

    #[test]
    fn test_self_link_ignored() {
        let mut stations = registry(&["A"]);
        stations.add_neighbour_link("A", "A").unwrap();
        assert!(!stations.get("A").unwrap().is_neighbour("A"));
    }

    #[test]
    fn test_iteration_is_ordered_by_id() {
        let stations = registry(&["C", "A", "B"]);
        let ids: Vec<_> = stations.iter().map(Station::id).collect();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert_eq!(stations.len(), 3);
    }
}
