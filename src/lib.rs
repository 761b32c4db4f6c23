//! Metro network journey planning and ticketing
//!
//! Stations and lines are loaded from CSV into a [`NetworkBuilder`], which
//! derives station adjacency once in [`NetworkBuilder::build`]. The resulting
//! [`Network`] is read-only and is borrowed by:
//!
//! - [`PathPlanner`]: breadth-first fewest-stops search
//! - [`JourneyAnnotator`]: picks a line per edge and produces
//!   board/change/arrive [`Instruction`]s
//! - [`TicketIssuer`]: prices a path, assigns a unique id and stores the
//!   [`Ticket`] in a [`TicketBook`]
//!
//! # Example
//!
//! ```rust,ignore
//! use metro_tickets::{MetroConfig, TicketBook, TicketIssuer, storage};
//!
//! let config = MetroConfig::default();
//! let network = storage::load_network(&config.data.stations, &config.data.lines)?;
//! let mut issuer = TicketIssuer::new(&network, &config.ticketing, rand::thread_rng());
//! let mut book = TicketBook::new();
//! let ticket = issuer.purchase(&mut book, "KSH", "RJC")?;
//! ```

pub mod config;
pub mod error;
pub mod journey;
pub mod line;
pub mod network;
pub mod planner;
pub mod station;
pub mod storage;
pub mod ticket;

pub use config::{DataConfig, MetroConfig, TicketingConfig};
pub use error::{MetroError, Result};
pub use journey::{Instruction, Journey, JourneyAnnotator};
pub use line::{Line, LineRegistry};
pub use network::{MapLine, Network, NetworkBuilder, NetworkEdge};
pub use planner::{Path, PathPlanner};
pub use station::{Station, StationRegistry};
pub use ticket::{Quote, Ticket, TicketBook, TicketIssuer};
