//! Runtime configuration
//!
//! Every field has a default so the binary runs without a config file. A TOML
//! file can override any subset:
//!
//! ```toml
//! [data]
//! tickets = "/var/lib/metro/tickets.csv"
//!
//! [ticketing]
//! fare_per_station = 12
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MetroError, Result};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetroConfig {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub ticketing: TicketingConfig,
}

/// Locations of the three CSV files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_stations_path")]
    pub stations: PathBuf,

    #[serde(default = "default_lines_path")]
    pub lines: PathBuf,

    #[serde(default = "default_tickets_path")]
    pub tickets: PathBuf,
}

/// Pricing and ticket id generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketingConfig {
    /// Fare charged per traversed edge
    #[serde(default = "default_fare_per_station")]
    pub fare_per_station: u32,

    /// Length of the random suffix appended to `ORIGIN-DESTINATION-`
    #[serde(default = "default_id_suffix_length")]
    pub id_suffix_length: usize,

    /// Ids generated before giving up on a collision-free one
    #[serde(default = "default_max_id_attempts")]
    pub max_id_attempts: u32,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_stations_path() -> PathBuf {
    PathBuf::from("data/stations.csv")
}

fn default_lines_path() -> PathBuf {
    PathBuf::from("data/lines.csv")
}

fn default_tickets_path() -> PathBuf {
    PathBuf::from("data/tickets.csv")
}

const fn default_fare_per_station() -> u32 {
    10
}

const fn default_id_suffix_length() -> usize {
    10
}

const fn default_max_id_attempts() -> u32 {
    16
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            stations: default_stations_path(),
            lines: default_lines_path(),
            tickets: default_tickets_path(),
        }
    }
}

impl Default for TicketingConfig {
    fn default() -> Self {
        Self {
            fare_per_station: default_fare_per_station(),
            id_suffix_length: default_id_suffix_length(),
            max_id_attempts: default_max_id_attempts(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl MetroConfig {
    /// Load from a TOML file, or fall back to defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(MetroError::MissingFile {
                        path: path.to_path_buf(),
                    });
                }
                let raw = fs::read_to_string(path)?;
                Self::from_toml(&raw)?
            },
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| MetroError::Configuration(e.to_string()))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        for (name, path) in [
            ("data.stations", &self.data.stations),
            ("data.lines", &self.data.lines),
            ("data.tickets", &self.data.tickets),
        ] {
            if path.as_os_str().is_empty() {
                return Err(MetroError::Configuration(format!("{name} must not be empty")));
            }
        }

        if self.ticketing.id_suffix_length == 0 {
            return Err(MetroError::Configuration(
                "ticketing.id_suffix_length must be greater than 0".to_string(),
            ));
        }

        if self.ticketing.max_id_attempts == 0 {
            return Err(MetroError::Configuration(
                "ticketing.max_id_attempts must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
