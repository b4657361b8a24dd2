//! Ticket data model for one parking stay

use crate::domain::types::{ParkingSpot, SpotId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generate a new UUIDv7 (time-sortable)
pub fn new_uuid_v7() -> String {
    Uuid::now_v7().to_string()
}

/// Record of one parking stay for one vehicle.
///
/// A ticket is open while `out_time` is `None`. Closing it sets `out_time`
/// and `price` once; neither changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    id: String,
    vehicle_reg_number: String,
    parking_spot: ParkingSpot,
    in_time: DateTime<Utc>,
    out_time: Option<DateTime<Utc>>,
    price: f64,
    #[serde(default)]
    recurring: bool,
}

impl Ticket {
    /// Create a new open ticket.
    ///
    /// The spot is copied into the ticket; the store keeps the authoritative
    /// availability.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::Utc;
    /// use parkit::domain::ticket::Ticket;
    /// use parkit::domain::types::{ParkingSpot, ParkingType, SpotId};
    ///
    /// let spot = ParkingSpot::new(SpotId(1), ParkingType::Car, false);
    /// let ticket = Ticket::open("ABCDEF", spot, Utc::now());
    /// assert!(ticket.is_open());
    /// assert_eq!(ticket.price(), 0.0);
    /// ```
    pub fn open(vehicle_reg_number: &str, parking_spot: ParkingSpot, in_time: DateTime<Utc>) -> Self {
        Self {
            id: new_uuid_v7(),
            vehicle_reg_number: vehicle_reg_number.to_string(),
            parking_spot,
            in_time,
            out_time: None,
            price: 0.0,
            recurring: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn vehicle_reg_number(&self) -> &str {
        &self.vehicle_reg_number
    }

    pub fn parking_spot(&self) -> &ParkingSpot {
        &self.parking_spot
    }

    #[inline]
    pub fn spot_id(&self) -> SpotId {
        self.parking_spot.id()
    }

    pub fn in_time(&self) -> DateTime<Utc> {
        self.in_time
    }

    pub fn out_time(&self) -> Option<DateTime<Utc>> {
        self.out_time
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn is_recurring(&self) -> bool {
        self.recurring
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.out_time.is_none()
    }

    /// Record the exit time. Returns false if the ticket was already closed.
    pub fn record_exit(&mut self, out_time: DateTime<Utc>) -> bool {
        if self.out_time.is_some() {
            return false;
        }
        self.out_time = Some(out_time);
        true
    }

    pub fn set_recurring(&mut self, recurring: bool) {
        self.recurring = recurring;
    }

    pub(crate) fn set_price(&mut self, price: f64) {
        self.price = price;
    }
}
