//! Two-phase network construction
//!
//! [`NetworkBuilder`] collects stations and line stops. [`NetworkBuilder::build`]
//! connects adjacency once and hands back an immutable [`Network`] that the
//! planner, annotator and issuer borrow.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::line::{Line, LineRegistry};
use crate::station::{Station, StationRegistry};

/// Accumulates stations and line stops before adjacency is derived
#[derive(Debug, Default)]
pub struct NetworkBuilder {
    stations: StationRegistry,
    lines: LineRegistry,
}

impl NetworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_station(&mut self, id: &str, name: &str) -> Result<&mut Self> {
        self.stations.insert(Station::new(id, name))?;
        Ok(self)
    }

    /// Place an existing station on a line at a 1-based position.
    ///
    /// The first stop seen for a line id creates the line with the given
    /// name and color; later rows reuse it.
    pub fn add_line_stop(
        &mut self,
        line_id: &str,
        line_name: &str,
        line_color: &str,
        station_id: &str,
        position: usize,
    ) -> Result<&mut Self> {
        self.stations.get(station_id)?;
        self.lines
            .get_or_insert(line_id, line_name, line_color)
            .add_station_at(station_id, position)?;
        Ok(self)
    }

    pub fn build(self) -> Result<Network> {
        let Self {
            mut stations,
            lines,
        } = self;
        lines.connect_all(&mut stations)?;
        info!(
            stations = stations.len(),
            lines = lines.len(),
            "Metro network built"
        );
        Ok(Network { stations, lines })
    }
}

/// A fully connected, read-only metro network
#[derive(Debug, Clone)]
pub struct Network {
    stations: StationRegistry,
    lines: LineRegistry,
}

/// A line as shown on the network map
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapLine {
    pub id: String,
    pub name: String,
    pub color: String,
}

/// Two neighbouring stations and every line running directly between them
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkEdge {
    pub from: String,
    pub to: String,
    pub lines: Vec<MapLine>,
}

impl Network {
    pub fn station(&self, id: &str) -> Result<&Station> {
        self.stations.get(id)
    }

    pub fn line(&self, id: &str) -> Result<&Line> {
        self.lines.get(id)
    }

    pub fn stations(&self) -> impl Iterator<Item = &Station> {
        self.stations.iter()
    }

    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.lines.iter()
    }

    /// Lines serving both stations, lowest id first
    pub fn common_lines(&self, a: &str, b: &str) -> Result<BTreeSet<&str>> {
        let a = self.station(a)?;
        let b = self.station(b)?;
        Ok(a.lines()
            .intersection(b.lines())
            .map(String::as_str)
            .collect())
    }

    /// Every adjacent station pair once, with the lines that run between them
    pub fn edges(&self) -> Vec<NetworkEdge> {
        let mut edges: BTreeMap<(&str, &str), Vec<MapLine>> = BTreeMap::new();
        for line in self.lines.iter() {
            for (a, b) in line.segments() {
                let key = if a <= b { (a, b) } else { (b, a) };
                edges.entry(key).or_default().push(MapLine {
                    id: line.id().to_string(),
                    name: line.name().to_string(),
                    color: line.color().to_string(),
                });
            }
        }
        edges
            .into_iter()
            .map(|((from, to), lines)| NetworkEdge {
                from: from.to_string(),
                to: to.to_string(),
                lines,
            })
            .collect()
    }
}
