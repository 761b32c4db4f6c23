//! Journey annotation: which line to ride on each edge, and where to change

use std::fmt;

use crate::error::{MetroError, Result};
use crate::line::Line;
use crate::network::Network;
use crate::planner::Path;
use crate::station::Station;

/// One line id per traversed edge of a [`Path`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Journey {
    lines: Vec<String>,
}

impl Journey {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Path indices at which the rider switches to a different line
    pub fn change_points(&self) -> impl Iterator<Item = usize> + '_ {
        (1..self.lines.len()).filter(|&i| self.lines[i] != self.lines[i - 1])
    }
}

/// A single ride/transfer step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction<'n> {
    Board { line: &'n Line, station: &'n Station },
    Change { station: &'n Station, line: &'n Line },
    Arrive { station: &'n Station },
}

impl fmt::Display for Instruction<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Board { line, station } => {
                write!(f, "Board the {} at {}.", line.name(), station.name())
            },
            Self::Change { station, line } => {
                write!(f, "At {}, change to {}.", station.name(), line.name())
            },
            Self::Arrive { station } => write!(f, "You will arrive at {}.", station.name()),
        }
    }
}

/// Assigns lines to path edges using the station line sets of a built network
#[derive(Debug, Clone, Copy)]
pub struct JourneyAnnotator<'n> {
    network: &'n Network,
}

impl<'n> JourneyAnnotator<'n> {
    pub fn new(network: &'n Network) -> Self {
        Self { network }
    }

    /// Choose a line for every edge of `path`.
    ///
    /// Stays on the current line while it still serves the next edge;
    /// otherwise takes the lowest line id serving both stations.
    pub fn annotate(&self, path: &Path) -> Result<Journey> {
        let mut lines = Vec::with_capacity(path.hops());
        let mut current: Option<&str> = None;

        for (from, to) in path.edges() {
            let common = self.network.common_lines(from, to)?;
            let chosen = match current {
                Some(line) if common.contains(line) => line,
                _ => common
                    .first()
                    .copied()
                    .ok_or_else(|| MetroError::DisconnectedEdge {
                        from: from.to_string(),
                        to: to.to_string(),
                    })?,
            };
            lines.push(chosen.to_string());
            current = Some(chosen);
        }

        Ok(Journey { lines })
    }

    /// Board, change and arrive steps for a path and its annotated journey
    pub fn describe_journey(&self, path: &Path, journey: &Journey) -> Result<Vec<Instruction<'n>>> {
        if journey.len() != path.hops() {
            return Err(MetroError::InvalidRequest(format!(
                "Journey has {} legs but path has {} hops",
                journey.len(),
                path.hops()
            )));
        }

        let stations = path.stations();
        let mut steps = Vec::new();
        if let Some(first) = journey.lines().first() {
            steps.push(Instruction::Board {
                line: self.network.line(first)?,
                station: self.network.station(path.origin())?,
            });
        }
        for i in journey.change_points() {
            steps.push(Instruction::Change {
                station: self.network.station(&stations[i])?,
                line: self.network.line(&journey.lines()[i])?,
            });
        }
        steps.push(Instruction::Arrive {
            station: self.network.station(path.destination())?,
        });
        Ok(steps)
    }
}
