//! Ticket pricing, issuance and the ticket book

use std::collections::HashMap;

use rand::Rng;
use tracing::{info, warn};

use crate::config::TicketingConfig;
use crate::error::{MetroError, Result};
use crate::journey::{Journey, JourneyAnnotator};
use crate::network::Network;
use crate::planner::{Path, PathPlanner};

/// Alphabet for the random part of ticket ids
const ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// A planned, priced trip that has not been bought yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub path: Path,
    pub price: u32,
}

/// A purchased (or reloaded) ticket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    id: String,
    path: Path,
    journey: Journey,
    price: u32,
}

impl Ticket {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn origin(&self) -> &str {
        self.path.origin()
    }

    pub fn destination(&self) -> &str {
        self.path.destination()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn journey(&self) -> &Journey {
        &self.journey
    }

    pub fn price(&self) -> u32 {
        self.price
    }

    /// One-line summary with station names and the priced fare
    pub fn summary(&self, network: &Network, currency: &str) -> Result<String> {
        Ok(format!(
            "ID: {}, PRICE: {currency}{}, {} to {}",
            self.id,
            self.price,
            network.station(self.origin())?.name(),
            network.station(self.destination())?.name()
        ))
    }
}

/// Append-only ticket collection keyed by id, kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct TicketBook {
    tickets: Vec<Ticket>,
    index: HashMap<String, usize>,
}

impl TicketBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Result<&Ticket> {
        self.index
            .get(id)
            .map(|&i| &self.tickets[i])
            .ok_or_else(|| MetroError::not_found("Ticket", id))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Store a ticket unless its id is already taken
    pub fn insert(&mut self, ticket: Ticket) -> Result<&Ticket> {
        if self.index.contains_key(ticket.id()) {
            return Err(MetroError::duplicate("Ticket", ticket.id()));
        }
        let position = self.tickets.len();
        self.index.insert(ticket.id.clone(), position);
        self.tickets.push(ticket);
        Ok(&self.tickets[position])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ticket> {
        self.tickets.iter()
    }

    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }
}

/// Plans, prices and issues tickets over a built network
#[derive(Debug)]
pub struct TicketIssuer<'n, R> {
    planner: PathPlanner<'n>,
    annotator: JourneyAnnotator<'n>,
    fare_per_station: u32,
    id_suffix_length: usize,
    max_id_attempts: u32,
    rng: R,
}

impl<'n, R: Rng> TicketIssuer<'n, R> {
    pub fn new(network: &'n Network, config: &TicketingConfig, rng: R) -> Self {
        Self {
            planner: PathPlanner::new(network),
            annotator: JourneyAnnotator::new(network),
            fare_per_station: config.fare_per_station,
            id_suffix_length: config.id_suffix_length,
            max_id_attempts: config.max_id_attempts,
            rng,
        }
    }

    /// Flat fare for every traversed edge
    pub fn price(&self, path: &Path) -> u32 {
        u32::try_from(path.hops())
            .unwrap_or(u32::MAX)
            .saturating_mul(self.fare_per_station)
    }

    /// Plan and price a trip without issuing anything
    pub fn quote(&self, origin: &str, destination: &str) -> Result<Quote> {
        let path = self
            .planner
            .shortest_path(origin, destination)?
            .ok_or_else(|| MetroError::NoRouteFound {
                from: origin.to_string(),
                to: destination.to_string(),
            })?;
        let price = self.price(&path);
        Ok(Quote { path, price })
    }

    /// Quote and issue in one step
    pub fn purchase<'b>(
        &mut self,
        book: &'b mut TicketBook,
        origin: &str,
        destination: &str,
    ) -> Result<&'b Ticket> {
        let quote = self.quote(origin, destination)?;
        self.issue(book, quote)
    }

    /// Turn an accepted quote into a stored ticket with a fresh id
    pub fn issue<'b>(&mut self, book: &'b mut TicketBook, quote: Quote) -> Result<&'b Ticket> {
        let journey = self.annotator.annotate(&quote.path)?;
        let id = self.generate_id(book, quote.path.origin(), quote.path.destination())?;
        info!(ticket_id = %id, price = quote.price, "Ticket issued");
        book.insert(Ticket {
            id,
            path: quote.path,
            journey,
            price: quote.price,
        })
    }

    /// Recreate a persisted ticket against the current network, keeping its id
    pub fn reload<'b>(
        &self,
        book: &'b mut TicketBook,
        ticket_id: &str,
        origin: &str,
        destination: &str,
    ) -> Result<&'b Ticket> {
        if book.contains(ticket_id) {
            return Err(MetroError::duplicate("Ticket", ticket_id));
        }
        let Quote { path, price } = self.quote(origin, destination)?;
        let journey = self.annotator.annotate(&path)?;
        book.insert(Ticket {
            id: ticket_id.to_string(),
            path,
            journey,
            price,
        })
    }

    fn generate_id(&mut self, book: &TicketBook, origin: &str, destination: &str) -> Result<String> {
        for attempt in 1..=self.max_id_attempts {
            let suffix: String = (0..self.id_suffix_length)
                .map(|_| char::from(ID_CHARSET[self.rng.gen_range(0..ID_CHARSET.len())]))
                .collect();
            let candidate = format!("{origin}-{destination}-{suffix}");
            if !book.contains(&candidate) {
                return Ok(candidate);
            }
            warn!(attempt, candidate = %candidate, "Ticket id collision, regenerating");
        }
        Err(MetroError::TicketIdExhausted {
            attempts: self.max_id_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::rngs::mock::StepRng;

    use super::*;
    use crate::network::tests::sample_network;

    fn config() -> TicketingConfig {
        TicketingConfig::default()
    }

    fn issuer(network: &Network) -> TicketIssuer<'_, StdRng> {
        TicketIssuer::new(network, &config(), StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_price_is_fare_times_hops() {
        let network = sample_network();
        let issuer = issuer(&network);
        let single = Path::new(vec!["A".to_string()]).unwrap();
        assert_eq!(issuer.price(&single), 0);
        let three = Path::new(vec!["A".into(), "B".into(), "C".into()]).unwrap();
        assert_eq!(issuer.price(&three), 20);
    }

    #[test]
    fn test_quote() {
        let network = sample_network();
        let quote = issuer(&network).quote("A", "D").unwrap();
        assert_eq!(quote.path.stations(), &["A", "B", "D"]);
        assert_eq!(quote.price, 20);
    }

    #[test]
    fn test_purchase_stores_ticket() {
        let network = sample_network();
        let mut issuer = issuer(&network);
        let mut book = TicketBook::new();

        let ticket = issuer.purchase(&mut book, "A", "D").unwrap().clone();
        assert_eq!(ticket.origin(), "A");
        assert_eq!(ticket.destination(), "D");
        assert_eq!(ticket.price(), 20);
        assert_eq!(ticket.journey().lines(), &["RED", "BLUE"]);
        assert!(ticket.id().starts_with("A-D-"));
        assert_eq!(ticket.id().len(), "A-D-".len() + 10);
        assert!(
            ticket.id()["A-D-".len()..]
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
        assert_eq!(book.get(ticket.id()).unwrap(), &ticket);
    }

    #[test]
    fn test_purchase_without_route_leaves_book_untouched() {
        let network = sample_network();
        let mut issuer = issuer(&network);
        let mut book = TicketBook::new();
        issuer.purchase(&mut book, "A", "B").unwrap();

        let err = issuer.purchase(&mut book, "A", "Z").unwrap_err();
        assert!(matches!(err, MetroError::NoRouteFound { .. }));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_purchase_same_station_is_invalid() {
        let network = sample_network();
        let mut book = TicketBook::new();
        let err = issuer(&network).purchase(&mut book, "C", "C").unwrap_err();
        assert!(matches!(err, MetroError::InvalidRequest(_)));
        assert!(book.is_empty());
    }

    #[test]
    fn test_ids_are_unique() {
        let network = sample_network();
        let mut issuer = TicketIssuer::new(
            &network,
            &TicketingConfig {
                id_suffix_length: 2,
                ..config()
            },
            StdRng::seed_from_u64(1),
        );
        let mut book = TicketBook::new();
        for _ in 0..50 {
            issuer.purchase(&mut book, "A", "C").unwrap();
        }
        assert_eq!(book.len(), 50);
    }

    #[test]
    fn test_id_generation_gives_up_after_attempt_budget() {
        let network = sample_network();
        // A constant rng yields the same id every time.
        let mut issuer = TicketIssuer::new(
            &network,
            &TicketingConfig {
                max_id_attempts: 3,
                ..config()
            },
            StepRng::new(0, 0),
        );
        let mut book = TicketBook::new();
        issuer.purchase(&mut book, "A", "B").unwrap();

        let err = issuer.purchase(&mut book, "A", "B").unwrap_err();
        assert!(matches!(err, MetroError::TicketIdExhausted { attempts: 3 }));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_reload_keeps_persisted_id() {
        let network = sample_network();
        let issuer = issuer(&network);
        let mut book = TicketBook::new();

        let ticket = issuer.reload(&mut book, "A-C-SAVED00001", "A", "C").unwrap();
        assert_eq!(ticket.id(), "A-C-SAVED00001");
        assert_eq!(ticket.price(), 20);
        assert_eq!(ticket.path().stations(), &["A", "B", "C"]);
    }

    #[test]
    fn test_reload_failures() {
        let network = sample_network();
        let issuer = issuer(&network);
        let mut book = TicketBook::new();
        issuer.reload(&mut book, "T1", "A", "B").unwrap();

        assert!(matches!(
            issuer.reload(&mut book, "T1", "A", "C"),
            Err(MetroError::Duplicate { .. })
        ));
        assert!(matches!(
            issuer.reload(&mut book, "T2", "A", "GONE"),
            Err(MetroError::NotFound { .. })
        ));
        assert!(matches!(
            issuer.reload(&mut book, "T3", "A", "Z"),
            Err(MetroError::NoRouteFound { .. })
        ));
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_book_keeps_insertion_order() {
        let network = sample_network();
        let issuer = issuer(&network);
        let mut book = TicketBook::new();
        for (id, to) in [("Z1", "D"), ("A1", "C"), ("M1", "B")] {
            issuer.reload(&mut book, id, "A", to).unwrap();
        }
        let ids: Vec<_> = book.iter().map(Ticket::id).collect();
        assert_eq!(ids, vec!["Z1", "A1", "M1"]);
        assert!(matches!(
            book.get("NOPE"),
            Err(MetroError::NotFound { entity_type: "Ticket", .. })
        ));
    }

    #[test]
    fn test_ticket_summary_uses_names_and_currency() {
        let network = sample_network();
        let mut book = TicketBook::new();
        let ticket = issuer(&network).reload(&mut book, "X", "A", "D").unwrap();
        assert_eq!(
            ticket.summary(&network, "₹").unwrap(),
            "ID: X, PRICE: ₹20, Station A to Station D"
        );
    }
}
