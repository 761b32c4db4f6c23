//! CSV persistence for stations, lines and tickets

use std::path::Path;

use csv::{ReaderBuilder, Trim, Writer};
use rand::Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{MetroError, Result};
use crate::network::{Network, NetworkBuilder};
use crate::ticket::{TicketBook, TicketIssuer};

// --- Record Layouts ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationRecord {
    pub station_id: String,
    pub station_name: String,
}

/// One (line, station) membership; rows of the same line share name and color
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    pub line_id: String,
    pub line_name: String,
    pub line_color: String,
    pub station_id: String,
    pub position: usize,
}

/// Price and path are recomputed on reload, so only the endpoints are stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketRecord {
    pub ticket_id: String,
    pub origin_id: String,
    pub destination_id: String,
}

// --- Reading ---

fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Err(MetroError::MissingFile {
            path: path.to_path_buf(),
        });
    }
    let csv_error = |source: csv::Error| MetroError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)
        .map_err(csv_error)?;
    reader
        .deserialize()
        .collect::<std::result::Result<Vec<T>, _>>()
        .map_err(csv_error)
}

pub fn read_stations(path: &Path) -> Result<Vec<StationRecord>> {
    read_records(path)
}

pub fn read_lines(path: &Path) -> Result<Vec<LineRecord>> {
    read_records(path)
}

pub fn read_tickets(path: &Path) -> Result<Vec<TicketRecord>> {
    read_records(path)
}

/// Read stations, then lines, then connect the network.
///
/// Both files are read before anything is built so a missing lines file
/// fails before any station is registered.
pub fn load_network(stations_path: &Path, lines_path: &Path) -> Result<Network> {
    let stations = read_stations(stations_path)?;
    let lines = read_lines(lines_path)?;

    let mut builder = NetworkBuilder::new();
    for record in &stations {
        builder.add_station(&record.station_id, &record.station_name)?;
    }
    for record in &lines {
        builder.add_line_stop(
            &record.line_id,
            &record.line_name,
            &record.line_color,
            &record.station_id,
            record.position,
        )?;
    }
    info!(
        path = %lines_path.display(),
        rows = lines.len(),
        "Loaded line stops"
    );
    builder.build()
}

/// Reload every persisted ticket into `book`, returning how many were added
pub fn load_tickets<R: Rng>(
    path: &Path,
    issuer: &TicketIssuer<'_, R>,
    book: &mut TicketBook,
) -> Result<usize> {
    let records = read_tickets(path)?;
    for record in &records {
        issuer.reload(book, &record.ticket_id, &record.origin_id, &record.destination_id)?;
    }
    info!(path = %path.display(), tickets = records.len(), "Loaded tickets");
    Ok(records.len())
}

// --- Writing ---

/// Rewrite the ticket file from the whole book
pub fn save_tickets(path: &Path, book: &TicketBook) -> Result<()> {
    let csv_error = |source: csv::Error| MetroError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = Writer::from_path(path).map_err(csv_error)?;
    // serialize() only emits a header with the first row; write it explicitly
    // so an empty book still produces a loadable file.
    writer
        .write_record(["ticket_id", "origin_id", "destination_id"])
        .map_err(csv_error)?;
    for ticket in book.iter() {
        writer
            .write_record([ticket.id(), ticket.origin(), ticket.destination()])
            .map_err(csv_error)?;
    }
    writer.flush()?;
    info!(path = %path.display(), tickets = book.len(), "Saved tickets");
    Ok(())
}
