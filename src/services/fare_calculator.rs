//! Fare calculation for closed tickets
//!
//! Billing rules:
//! - The first `grace_minutes` of every stay are free
//! - Shorter stays cost nothing at all
//! - The rest is billed per hour (fractional) at the spot type's rate
//! - Recurring vehicles get a discount; the discounted fare is rounded to a
//!   whole currency unit, half away from zero

use crate::domain::error::ParkingError;
use crate::domain::ticket::Ticket;
use crate::domain::types::ParkingType;
use crate::infra::config::Config;
use std::collections::HashMap;
use tracing::debug;

const MS_PER_HOUR: f64 = 60.0 * 60.0 * 1000.0;

/// Computes the price owed for a ticket
#[derive(Debug, Clone)]
pub struct FareCalculator {
    hourly_rates: HashMap<ParkingType, f64>,
    grace_hours: f64,
    recurring_discount: f64,
}

impl FareCalculator {
    pub fn new(config: &Config) -> Self {
        Self::with_rates(
            config.hourly_rates().clone(),
            config.grace_minutes(),
            config.recurring_discount(),
        )
    }

    pub fn with_rates(
        hourly_rates: HashMap<ParkingType, f64>,
        grace_minutes: u32,
        recurring_discount: f64,
    ) -> Self {
        Self {
            hourly_rates,
            grace_hours: f64::from(grace_minutes) / 60.0,
            recurring_discount,
        }
    }

    /// Discount fraction applied to recurring vehicles
    pub fn recurring_discount(&self) -> f64 {
        self.recurring_discount
    }

    /// Price the ticket and store the result on it.
    ///
    /// Only `price` is modified. The ticket must carry an out time no earlier
    /// than its in time, and its spot type must have a configured rate.
    pub fn calculate_fare(&self, ticket: &mut Ticket) -> Result<f64, ParkingError> {
        let in_time = ticket.in_time();
        let out_time = match ticket.out_time() {
            Some(out) if out >= in_time => out,
            out_time => return Err(ParkingError::InvalidTiming { in_time, out_time }),
        };

        let parking_type = ticket.parking_spot().parking_type();
        let rate = self
            .hourly_rates
            .get(&parking_type)
            .copied()
            .ok_or_else(|| ParkingError::UnknownSpotType(parking_type.to_string()))?;

        let hours = (out_time - in_time).num_milliseconds() as f64 / MS_PER_HOUR;
        let billable_hours = if hours < self.grace_hours { 0.0 } else { hours - self.grace_hours };

        let base_price = billable_hours * rate;
        let price = if ticket.is_recurring() && base_price > 0.0 {
            (base_price * (1.0 - self.recurring_discount)).round()
        } else {
            base_price
        };

        debug!(
            ticket_id = %ticket.id(),
            parking_type = %parking_type,
            hours = %format!("{hours:.3}"),
            billable_hours = %format!("{billable_hours:.3}"),
            recurring = %ticket.is_recurring(),
            price = %price,
            "fare_calculated"
        );

        ticket.set_price(price);
        Ok(price)
    }
}
