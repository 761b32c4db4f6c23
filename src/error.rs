//! Error types for network loading, journey planning and ticketing

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building the network or issuing tickets
#[derive(Debug, Error)]
pub enum MetroError {
    /// Station, line or ticket id unknown to its registry
    #[error("{entity_type} not found: {id}")]
    NotFound {
        /// Kind of entity that was looked up
        entity_type: &'static str,
        /// The identifier that was requested
        id: String,
    },

    /// An entity with the same identifier is already registered
    #[error("Duplicate {entity_type}: {id}")]
    Duplicate {
        /// Kind of entity that was inserted
        entity_type: &'static str,
        /// The clashing identifier
        id: String,
    },

    /// The request itself is malformed (e.g. origin equals destination)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Breadth-first search exhausted without reaching the destination
    #[error("No route found from {from} to {to}")]
    NoRouteFound {
        /// Origin station id
        from: String,
        /// Destination station id
        to: String,
    },

    /// Two consecutive path stations share no line
    #[error("No line connects {from} and {to}")]
    DisconnectedEdge {
        /// First station of the edge
        from: String,
        /// Second station of the edge
        to: String,
    },

    /// A line stop position of zero (positions are 1-based)
    #[error("Invalid position {position} for station {station_id} on line {line_id}")]
    InvalidPosition {
        line_id: String,
        station_id: String,
        position: usize,
    },

    /// Every candidate ticket id collided with an existing one
    #[error("Could not allocate a unique ticket id after {attempts} attempts")]
    TicketIdExhausted {
        /// Number of ids generated before giving up
        attempts: u32,
    },

    /// A required data file does not exist
    #[error("File '{}' doesn't exist", path.display())]
    MissingFile {
        /// Path that was expected
        path: PathBuf,
    },

    /// Malformed CSV content
    #[error("CSV error in '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Underlying I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl MetroError {
    /// Create a not found error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Create a duplicate error
    pub fn duplicate(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type,
            id: id.into(),
        }
    }

    /// Returns true if the caller can recover by asking for different input
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::InvalidRequest(_) | Self::NoRouteFound { .. }
        )
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, MetroError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = MetroError::not_found("Station", "XYZ");
        assert_eq!(err.to_string(), "Station not found: XYZ");
    }

    #[test]
    fn test_no_route_message_names_both_ends() {
        let err = MetroError::NoRouteFound {
            from: "AAA".to_string(),
            to: "ZZZ".to_string(),
        };
        assert!(err.to_string().contains("AAA"));
        assert!(err.to_string().contains("ZZZ"));
    }

    #[test]
    fn test_missing_file_message() {
        let err = MetroError::MissingFile {
            path: PathBuf::from("data/stations.csv"),
        };
        assert_eq!(err.to_string(), "File 'data/stations.csv' doesn't exist");
    }

    #[test]
    fn test_input_errors() {
        assert!(MetroError::not_found("Ticket", "T").is_input_error());
        assert!(MetroError::InvalidRequest("same".to_string()).is_input_error());
        assert!(
            MetroError::NoRouteFound {
                from: "A".to_string(),
                to: "B".to_string(),
            }
            .is_input_error()
        );
        assert!(!MetroError::TicketIdExhausted { attempts: 3 }.is_input_error());
        assert!(
            !MetroError::MissingFile {
                path: PathBuf::from("x.csv"),
            }
            .is_input_error()
        );
    }
}
