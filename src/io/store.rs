//! Spot and ticket store interfaces, with an in-process implementation
//!
//! The parking service only talks to the `SpotStore` and `TicketStore`
//! traits. `MemoryStore` implements both behind one mutex so that spot
//! allocation and open-ticket checks are atomic.

use crate::domain::ticket::Ticket;
use crate::domain::types::{ParkingSpot, ParkingType, SpotId};
use crate::io::ticket_ledger::TicketLedger;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;
use tracing::{debug, error, warn};

/// Tracks spot availability by type
pub trait SpotStore: Send + Sync {
    /// Lowest-numbered available spot of the given type
    fn next_available_spot(&self, parking_type: ParkingType) -> Option<SpotId>;

    /// Current state of a spot
    fn get_spot(&self, id: SpotId) -> Option<ParkingSpot>;

    /// Record a spot's availability. Returns true if successful
    fn update_spot(&self, spot: &ParkingSpot) -> bool;

    /// Pick the next available spot of a type and mark it occupied in one step
    fn claim_next_available(&self, parking_type: ParkingType) -> Option<ParkingSpot>;
}

/// Persists tickets
pub trait TicketStore: Send + Sync {
    /// Store a new open ticket. Returns false if the vehicle already has one
    fn save_ticket(&self, ticket: &Ticket) -> bool;

    /// The open ticket for a vehicle, if any
    fn get_open_ticket(&self, vehicle_reg_number: &str) -> Option<Ticket>;

    /// Replace a stored ticket (matched by id). Returns true if successful
    fn update_ticket(&self, ticket: &Ticket) -> bool;

    /// Whether the vehicle has at least one closed ticket
    fn has_prior_closed_ticket(&self, vehicle_reg_number: &str) -> bool;

    /// Whether the vehicle currently has an open ticket
    fn is_currently_parked(&self, vehicle_reg_number: &str) -> bool;
}

struct StoreState {
    spots: BTreeMap<SpotId, ParkingSpot>,
    /// All tickets by vehicle, oldest first
    tickets: FxHashMap<String, Vec<Ticket>>,
}

impl StoreState {
    fn open_ticket(&self, vehicle_reg_number: &str) -> Option<&Ticket> {
        self.tickets.get(vehicle_reg_number)?.iter().find(|t| t.is_open())
    }
}

/// In-process spot and ticket store
pub struct MemoryStore {
    state: Mutex<StoreState>,
    /// Closed tickets are appended here when present
    ledger: Option<TicketLedger>,
}

impl MemoryStore {
    pub fn new(spots: Vec<ParkingSpot>) -> Self {
        let spots = spots.into_iter().map(|s| (s.id(), s)).collect();
        Self { state: Mutex::new(StoreState { spots, tickets: FxHashMap::default() }), ledger: None }
    }

    /// Attach a ledger that receives every closed ticket
    pub fn with_ledger(mut self, ledger: TicketLedger) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Load closed tickets from a previous run (recurrence history).
    /// Open tickets are skipped. Returns how many were loaded.
    pub fn restore_history(&self, tickets: Vec<Ticket>) -> usize {
        let mut state = self.state.lock();
        let mut restored = 0;
        for ticket in tickets {
            if ticket.is_open() {
                warn!(ticket_id = %ticket.id(), "history_open_ticket_skipped");
                continue;
            }
            state.tickets.entry(ticket.vehicle_reg_number().to_string()).or_default().push(ticket);
            restored += 1;
        }
        restored
    }

    /// Number of available spots of a type
    pub fn available_count(&self, parking_type: ParkingType) -> usize {
        self.state
            .lock()
            .spots
            .values()
            .filter(|s| s.parking_type() == parking_type && s.is_available())
            .count()
    }

    /// All tickets recorded for a vehicle, oldest first
    pub fn tickets_for(&self, vehicle_reg_number: &str) -> Vec<Ticket> {
        self.state.lock().tickets.get(vehicle_reg_number).cloned().unwrap_or_default()
    }
}

impl SpotStore for MemoryStore {
    fn next_available_spot(&self, parking_type: ParkingType) -> Option<SpotId> {
        self.state
            .lock()
            .spots
            .values()
            .find(|s| s.parking_type() == parking_type && s.is_available())
            .map(|s| s.id())
    }

    fn get_spot(&self, id: SpotId) -> Option<ParkingSpot> {
        self.state.lock().spots.get(&id).copied()
    }

    fn update_spot(&self, spot: &ParkingSpot) -> bool {
        let mut state = self.state.lock();
        match state.spots.get_mut(&spot.id()) {
            // Type is fixed; only availability may change
            Some(stored) if stored.parking_type() == spot.parking_type() => {
                stored.set_available(spot.is_available());
                debug!(spot_id = %spot.id(), available = %spot.is_available(), "spot_updated");
                true
            }
            Some(stored) => {
                error!(
                    spot_id = %spot.id(),
                    stored_type = %stored.parking_type(),
                    requested_type = %spot.parking_type(),
                    "spot_update_type_mismatch"
                );
                false
            }
            None => {
                error!(spot_id = %spot.id(), "spot_update_unknown_spot");
                false
            }
        }
    }

    fn claim_next_available(&self, parking_type: ParkingType) -> Option<ParkingSpot> {
        let mut state = self.state.lock();
        let spot = state
            .spots
            .values_mut()
            .find(|s| s.parking_type() == parking_type && s.is_available())?;
        spot.set_available(false);
        debug!(spot_id = %spot.id(), parking_type = %parking_type, "spot_claimed");
        Some(*spot)
    }
}

impl TicketStore for MemoryStore {
    fn save_ticket(&self, ticket: &Ticket) -> bool {
        let mut state = self.state.lock();
        let reg = ticket.vehicle_reg_number();
        if let Some(existing) = state.open_ticket(reg) {
            warn!(
                vehicle = %reg,
                existing_ticket_id = %existing.id(),
                "ticket_save_refused_already_open"
            );
            return false;
        }
        state.tickets.entry(reg.to_string()).or_default().push(ticket.clone());
        debug!(ticket_id = %ticket.id(), vehicle = %reg, "ticket_saved");
        true
    }

    fn get_open_ticket(&self, vehicle_reg_number: &str) -> Option<Ticket> {
        self.state.lock().open_ticket(vehicle_reg_number).cloned()
    }

    fn update_ticket(&self, ticket: &Ticket) -> bool {
        let mut state = self.state.lock();
        let Some(stored) = state
            .tickets
            .get_mut(ticket.vehicle_reg_number())
            .and_then(|tickets| tickets.iter_mut().find(|t| t.id() == ticket.id()))
        else {
            error!(ticket_id = %ticket.id(), "ticket_update_unknown_ticket");
            return false;
        };

        // Closed tickets are final
        if !stored.is_open() {
            error!(ticket_id = %ticket.id(), "ticket_update_already_closed");
            return false;
        }

        // The append runs under the store lock so a ticket is written to the
        // ledger at most once. Store calls wait on disk I/O for closing exits.
        if !ticket.is_open() {
            if let Some(ledger) = &self.ledger {
                if !ledger.append(ticket) {
                    return false;
                }
            }
        }

        *stored = ticket.clone();
        debug!(ticket_id = %ticket.id(), open = %ticket.is_open(), "ticket_updated");
        true
    }

    fn has_prior_closed_ticket(&self, vehicle_reg_number: &str) -> bool {
        self.state
            .lock()
            .tickets
            .get(vehicle_reg_number)
            .is_some_and(|tickets| tickets.iter().any(|t| !t.is_open()))
    }

    fn is_currently_parked(&self, vehicle_reg_number: &str) -> bool {
        self.state.lock().open_ticket(vehicle_reg_number).is_some()
    }
}
