//! Line registry
//!
//! A line is an ordered sequence of stations. Adjacency is derived from it in
//! one pass once every line has been loaded.

use std::collections::BTreeMap;

use crate::error::{MetroError, Result};
use crate::station::StationRegistry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    id: String,
    name: String,
    color: String,
    stations: Vec<String>,
}

impl Line {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            stations: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Presentation color, usually a hex string such as `#E21836`
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Station ids in route order
    pub fn stations(&self) -> &[String] {
        &self.stations
    }

    /// Insert a station at a 1-based position along the route.
    ///
    /// Positions past the end append, so gaps in the numbering (1, 2, 4) keep
    /// the stops in arrival order.
    pub fn add_station_at(&mut self, station_id: &str, position: usize) -> Result<()> {
        if position == 0 {
            return Err(MetroError::InvalidPosition {
                line_id: self.id.clone(),
                station_id: station_id.to_string(),
                position,
            });
        }
        if self.stations.iter().any(|s| s == station_id) {
            return Err(MetroError::duplicate(
                "Line stop",
                format!("{} on {}", station_id, self.id),
            ));
        }
        let index = (position - 1).min(self.stations.len());
        self.stations.insert(index, station_id.to_string());
        Ok(())
    }

    /// Consecutive station pairs along the route
    pub fn segments(&self) -> impl Iterator<Item = (&str, &str)> {
        self.stations
            .windows(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct LineRegistry {
    lines: BTreeMap<String, Line>,
}

impl LineRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Result<&Line> {
        self.lines
            .get(id)
            .ok_or_else(|| MetroError::not_found("Line", id))
    }

    /// Fetch a line, creating it with the given name and color on first sight
    pub fn get_or_insert(&mut self, id: &str, name: &str, color: &str) -> &mut Line {
        self.lines
            .entry(id.to_string())
            .or_insert_with(|| Line::new(id, name, color))
    }

    pub fn add_station_at(&mut self, line_id: &str, station_id: &str, position: usize) -> Result<()> {
        self.lines
            .get_mut(line_id)
            .ok_or_else(|| MetroError::not_found("Line", line_id))?
            .add_station_at(station_id, position)
    }

    /// Link consecutive stations on every line and record line membership.
    ///
    /// Must run once, after every line and station is loaded, so that each
    /// station's line set is complete before anything plans over it.
    pub fn connect_all(&self, stations: &mut StationRegistry) -> Result<()> {
        for line in self.lines.values() {
            for station_id in line.stations() {
                stations.get_mut(station_id)?.record_line(line.id());
            }
            for (a, b) in line.segments() {
                stations.add_neighbour_link(a, b)?;
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Line> {
        self.lines.values()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
