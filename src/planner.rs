//! Shortest-path planning over the station adjacency graph

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::error::{MetroError, Result};
use crate::network::Network;

/// Ordered, duplicate-free station ids from origin to destination inclusive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    stations: Vec<String>,
}

impl Path {
    /// Build a path from station ids; it must be non-empty and never revisit a station
    pub fn new(stations: Vec<String>) -> Result<Self> {
        if stations.is_empty() {
            return Err(MetroError::InvalidRequest("Path must not be empty".to_string()));
        }
        let mut seen = HashSet::new();
        for id in &stations {
            if !seen.insert(id.as_str()) {
                return Err(MetroError::InvalidRequest(format!(
                    "Path visits {id} more than once"
                )));
            }
        }
        Ok(Self { stations })
    }

    pub fn stations(&self) -> &[String] {
        &self.stations
    }

    pub fn origin(&self) -> &str {
        &self.stations[0]
    }

    pub fn destination(&self) -> &str {
        &self.stations[self.stations.len() - 1]
    }

    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Number of traversed edges
    pub fn hops(&self) -> usize {
        self.stations.len() - 1
    }

    /// Consecutive station pairs
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.stations
            .windows(2)
            .map(|pair| (pair[0].as_str(), pair[1].as_str()))
    }
}

/// Breadth-first planner borrowing a built network
#[derive(Debug, Clone, Copy)]
pub struct PathPlanner<'n> {
    network: &'n Network,
}

impl<'n> PathPlanner<'n> {
    pub fn new(network: &'n Network) -> Self {
        Self { network }
    }

    /// Fewest-stops path between two stations, or `None` if unreachable.
    ///
    /// Neighbours are expanded in id order, so among equally short paths the
    /// result is always the same one.
    pub fn shortest_path(&self, origin: &str, destination: &str) -> Result<Option<Path>> {
        if origin == destination {
            return Err(MetroError::InvalidRequest(
                "Origin and destination cannot be the same".to_string(),
            ));
        }
        let origin = self.network.station(origin)?.id();
        let destination = self.network.station(destination)?.id();

        let mut queue = VecDeque::from([origin]);
        let mut parents: HashMap<&'n str, Option<&'n str>> = HashMap::from([(origin, None)]);

        while let Some(current) = queue.pop_front() {
            if current == destination {
                break;
            }
            for neighbour in self.network.station(current)?.neighbours() {
                if !parents.contains_key(neighbour) {
                    parents.insert(neighbour, Some(current));
                    queue.push_back(neighbour);
                }
            }
        }

        if !parents.contains_key(destination) {
            debug!(origin, destination, visited = parents.len(), "Destination unreachable");
            return Ok(None);
        }

        let mut stations = Vec::new();
        let mut cursor = Some(destination);
        while let Some(id) = cursor {
            stations.push(id.to_string());
            cursor = parents.get(id).copied().flatten();
        }
        stations.reverse();
        debug!(origin, destination, stops = stations.len(), "Shortest path found");

        Path::new(stations).map(Some)
    }
}
