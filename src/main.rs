use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use metro_tickets::{
    JourneyAnnotator, MetroConfig, Network, Ticket, TicketBook, TicketIssuer, storage,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// --- Configuration ---

/// Width of the ID column in the station listing
const STATION_ID_WIDTH: usize = 3;

#[derive(Parser)]
#[command(name = "metro")]
#[command(author, version, about = "Metro journey planner and ticket office", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML configuration file
    #[arg(short, long, env = "METRO_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available stations
    Stations,

    /// Buy a ticket between two stations
    Purchase {
        /// Origin station id
        origin: String,

        /// Destination station id
        destination: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List purchased tickets
    Tickets,

    /// Show ride and transfer instructions for a ticket
    Journey {
        /// Ticket id
        ticket_id: String,
    },

    /// Print every connection in the network with the lines serving it
    Map {
        /// Emit JSON (with line colors) instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Station ids are uppercase by convention
fn normalize_station_id(raw: &str) -> String {
    raw.trim().to_uppercase()
}

// --- Main Execution ---

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(log_filter_from_verbosity(cli.verbose)))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = MetroConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Stations before lines before tickets: each depends on the previous.
    let network = storage::load_network(&config.data.stations, &config.data.lines)
        .context("Failed to load metro network")?;
    let mut issuer = TicketIssuer::new(&network, &config.ticketing, rand::thread_rng());
    let mut book = TicketBook::new();
    storage::load_tickets(&config.data.tickets, &issuer, &mut book)
        .context("Failed to load tickets")?;

    let currency = config.ticketing.currency_symbol.as_str();

    match cli.command {
        Commands::Stations => view_stations(&network),
        Commands::Purchase {
            origin,
            destination,
            yes,
        } => {
            let origin = normalize_station_id(&origin);
            let destination = normalize_station_id(&destination);
            let purchased = purchase_ticket(
                &network,
                &mut issuer,
                &mut book,
                &origin,
                &destination,
                currency,
                yes,
            )?;
            if let Some(ticket_id) = purchased {
                storage::save_tickets(&config.data.tickets, &book)
                    .context("Failed to save tickets")?;
                let ticket = book.get(&ticket_id)?;
                println!("Ticket purchased successfully!");
                println!("{}", ticket.summary(&network, currency)?);
                print_journey(&network, ticket)?;
            }
        },
        Commands::Tickets => view_purchased_tickets(&book, currency),
        Commands::Journey { ticket_id } => show_journey(&network, &book, &ticket_id)?,
        Commands::Map { json } => draw_station_map(&network, json)?,
    }

    Ok(())
}

// --- Commands ---

fn view_stations(network: &Network) {
    println!("{:<width$} | NAME", "ID", width = STATION_ID_WIDTH);
    for station in network.stations() {
        println!(
            "{:<width$} | {}",
            station.id(),
            station.name(),
            width = STATION_ID_WIDTH
        );
    }
}

/// Quote, confirm and issue. Returns the new ticket id, or `None` when the
/// traveller declines or the request cannot be served.
fn purchase_ticket<R: rand::Rng>(
    network: &Network,
    issuer: &mut TicketIssuer<'_, R>,
    book: &mut TicketBook,
    origin: &str,
    destination: &str,
    currency: &str,
    assume_yes: bool,
) -> Result<Option<String>> {
    let quote = match issuer.quote(origin, destination) {
        Ok(quote) => quote,
        Err(e) if e.is_input_error() => {
            println!("{e}");
            return Ok(None);
        },
        Err(e) => return Err(e.into()),
    };

    println!(
        "The ticket from {} to {} costs {currency}{}.",
        network.station(origin)?.name(),
        network.station(destination)?.name(),
        quote.price
    );

    if !assume_yes && !confirm("Do you want to buy it? (Y/N): ")? {
        println!("No ticket purchased.");
        return Ok(None);
    }

    let ticket = issuer.issue(book, quote)?;
    Ok(Some(ticket.id().to_string()))
}

/// Prompt until the answer is Y or N
fn confirm(prompt: &str) -> Result<bool> {
    let stdin = io::stdin();
    let mut input = String::new();
    loop {
        print!("{prompt}");
        io::stdout().flush()?;
        input.clear();
        if stdin.lock().read_line(&mut input)? == 0 {
            return Ok(false);
        }
        match input.trim().to_uppercase().as_str() {
            "Y" => return Ok(true),
            "N" => return Ok(false),
            _ => println!("Please enter a valid option."),
        }
    }
}

fn view_purchased_tickets(book: &TicketBook, currency: &str) {
    let id_width = book
        .iter()
        .map(|t| t.id().len())
        .max()
        .unwrap_or(0)
        .max("ID".len());
    println!("{:<id_width$} | ORIGIN | DESTINATION | PRICE", "ID");
    for ticket in book.iter() {
        println!(
            "{:<id_width$} | {:<6} | {:<11} | {currency}{}",
            ticket.id(),
            ticket.origin(),
            ticket.destination(),
            ticket.price()
        );
    }
}

/// Print the journey for a stored ticket; an unknown id is an error
fn show_journey(network: &Network, book: &TicketBook, ticket_id: &str) -> Result<()> {
    let ticket = book
        .get(ticket_id.trim())
        .with_context(|| format!("Cannot show journey for '{}'", ticket_id.trim()))?;
    print_journey(network, ticket)
}

fn print_journey(network: &Network, ticket: &Ticket) -> Result<()> {
    let steps = JourneyAnnotator::new(network).describe_journey(ticket.path(), ticket.journey())?;
    for step in steps {
        println!("{step}");
    }
    Ok(())
}

fn draw_station_map(network: &Network, json: bool) -> Result<()> {
    let edges = network.edges();
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&edges).context("Failed to serialize network map")?
        );
        return Ok(());
    }
    for edge in &edges {
        let lines: Vec<&str> = edge.lines.iter().map(|l| l.name.as_str()).collect();
        println!("{} -- {}  {}", edge.from, edge.to, lines.join(", "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use metro_tickets::{MetroError, NetworkBuilder};

    use super::*;

    #[test]
    fn test_log_filter_from_verbosity() {
        assert_eq!(log_filter_from_verbosity(0), "warn");
        assert_eq!(log_filter_from_verbosity(1), "info");
        assert_eq!(log_filter_from_verbosity(2), "debug");
        assert_eq!(log_filter_from_verbosity(9), "trace");
    }

    #[test]
    fn test_normalize_station_id() {
        assert_eq!(normalize_station_id("  ksh \n"), "KSH");
    }

    #[test]
    fn test_show_journey_unknown_ticket_fails() {
        let mut builder = NetworkBuilder::new();
        builder.add_station("A", "Alpha").unwrap();
        let network = builder.build().unwrap();
        let book = TicketBook::new();

        let err = show_journey(&network, &book, " A-B-MISSING ").unwrap_err();
        assert!(err.to_string().contains("A-B-MISSING"));
        let cause = err.downcast_ref::<MetroError>().unwrap();
        assert!(matches!(cause, MetroError::NotFound { entity_type: "Ticket", .. }));
    }

    #[test]
    fn test_cli_parses_purchase() {
        let cli = Cli::try_parse_from(["metro", "-v", "purchase", "a", "d", "--yes"]).unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Purchase {
                origin,
                destination,
                yes,
            } => {
                assert_eq!(origin, "a");
                assert_eq!(destination, "d");
                assert!(yes);
            },
            _ => unreachable!("Expected purchase command"),
        }
    }
}
