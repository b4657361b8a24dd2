//! Vehicle entry and exit orchestration
//!
//! Each call handles one vehicle from start to finish:
//! - Entry: registration check, spot claim, open ticket
//! - Exit: close ticket, price it, release the spot
//!
//! Durable state lives in the injected stores. Failures are returned to the
//! caller (and counted) so one bad operation does not stop the facility.

use crate::domain::error::ParkingError;
use crate::domain::ticket::Ticket;
use crate::domain::types::{ParkingType, SpotId};
use crate::infra::metrics::Metrics;
use crate::io::input::InputSource;
use crate::io::store::{SpotStore, TicketStore};
use crate::services::fare_calculator::FareCalculator;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Result of a vehicle arriving at the entrance
#[derive(Debug, Clone, PartialEq)]
pub enum EntryOutcome {
    /// Spot assigned and open ticket saved
    Parked { spot_id: SpotId, ticket: Ticket },
    /// The vehicle already has an open ticket; nothing was allocated
    AlreadyParked { vehicle_reg_number: String },
}

/// Result of a vehicle leaving
#[derive(Debug, Clone, PartialEq)]
pub struct ExitReceipt {
    pub vehicle_reg_number: String,
    pub spot_id: SpotId,
    pub price: f64,
    pub out_time: DateTime<Utc>,
    pub recurring: bool,
}

pub struct ParkingService<I> {
    input: I,
    spots: Arc<dyn SpotStore>,
    tickets: Arc<dyn TicketStore>,
    fares: FareCalculator,
    metrics: Arc<Metrics>,
}

impl<I: InputSource> ParkingService<I> {
    pub fn new(
        input: I,
        spots: Arc<dyn SpotStore>,
        tickets: Arc<dyn TicketStore>,
        fares: FareCalculator,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self { input, spots, tickets, fares, metrics }
    }

    /// Input source, for callers that drive a menu around the service
    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    pub fn fares(&self) -> &FareCalculator {
        &self.fares
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Admit a vehicle: read its registration and type, claim a spot,
    /// and save an open ticket.
    pub fn process_incoming_vehicle(&mut self) -> Result<EntryOutcome, ParkingError> {
        self.enter().inspect_err(|e| {
            // Running out of input is a shutdown, not a failed entry
            if !matches!(e, ParkingError::EndOfInput) {
                self.metrics.record_failure();
                error!(error = %e, "vehicle_entry_failed");
            }
        })
    }

    /// Let a vehicle out: close its open ticket, price it, free the spot.
    pub fn process_exiting_vehicle(&mut self) -> Result<ExitReceipt, ParkingError> {
        self.exit().inspect_err(|e| {
            if !matches!(e, ParkingError::EndOfInput) {
                self.metrics.record_failure();
                error!(error = %e, "vehicle_exit_failed");
            }
        })
    }

    fn enter(&mut self) -> Result<EntryOutcome, ParkingError> {
        let reg = self.read_registration()?;

        if self.tickets.is_currently_parked(&reg) {
            warn!(vehicle = %reg, "vehicle_already_parked");
            self.metrics.record_rejected_entry();
            return Ok(EntryOutcome::AlreadyParked { vehicle_reg_number: reg });
        }

        let parking_type = ParkingType::from_selection(self.input.read_vehicle_type_selection()?)?;

        let spot = self
            .spots
            .claim_next_available(parking_type)
            .ok_or(ParkingError::NoAvailableSpot(parking_type))?;

        let ticket = Ticket::open(&reg, spot, Utc::now());
        if !self.tickets.save_ticket(&ticket) {
            // Hand the spot back so a failed save does not leak it; the save
            // failure is what gets reported
            if let Err(e) = self.release_spot(spot.id()) {
                error!(spot_id = %spot.id(), error = %e, "spot_release_after_failed_save_failed");
            }
            return Err(ParkingError::Persistence(format!("ticket for vehicle {reg}")));
        }

        info!(
            vehicle = %reg,
            spot_id = %spot.id(),
            parking_type = %parking_type,
            ticket_id = %ticket.id(),
            in_time = %ticket.in_time(),
            "vehicle_parked"
        );
        self.metrics.record_entry();

        Ok(EntryOutcome::Parked { spot_id: spot.id(), ticket })
    }

    fn exit(&mut self) -> Result<ExitReceipt, ParkingError> {
        let reg = self.read_registration()?;

        let mut ticket = self
            .tickets
            .get_open_ticket(&reg)
            .ok_or_else(|| ParkingError::NoOpenTicket(reg.clone()))?;

        let out_time = Utc::now();
        ticket.record_exit(out_time);
        ticket.set_recurring(self.tickets.has_prior_closed_ticket(&reg));

        let price = self.fares.calculate_fare(&mut ticket)?;

        if !self.tickets.update_ticket(&ticket) {
            return Err(ParkingError::Persistence(format!("ticket {}", ticket.id())));
        }

        self.release_spot(ticket.spot_id())?;

        info!(
            vehicle = %reg,
            spot_id = %ticket.spot_id(),
            ticket_id = %ticket.id(),
            out_time = %out_time,
            price = %price,
            recurring = %ticket.is_recurring(),
            "vehicle_exited"
        );
        self.metrics.record_exit(price, ticket.is_recurring());

        Ok(ExitReceipt {
            vehicle_reg_number: reg,
            spot_id: ticket.spot_id(),
            price,
            out_time,
            recurring: ticket.is_recurring(),
        })
    }

    /// Registration number from the input source, trimmed. Blank is refused
    /// before any store is touched.
    fn read_registration(&mut self) -> Result<String, ParkingError> {
        let reg = self.input.read_vehicle_registration_number()?;
        let reg = reg.trim();
        if reg.is_empty() {
            return Err(ParkingError::Input("vehicle registration number is empty".to_string()));
        }
        Ok(reg.to_string())
    }

    /// Mark a spot available again, using the store's view of the spot
    fn release_spot(&self, id: SpotId) -> Result<(), ParkingError> {
        let mut spot = self
            .spots
            .get_spot(id)
            .ok_or_else(|| ParkingError::Persistence(format!("spot {id} (unknown)")))?;
        spot.set_available(true);
        if !self.spots.update_spot(&spot) {
            return Err(ParkingError::Persistence(format!("spot {id}")));
        }
        Ok(())
    }
}
