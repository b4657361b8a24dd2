//! Domain models - core parking types and ticket model
//!
//! This module contains the canonical data types used throughout the system:
//! - `ParkingSpot` - a physical spot of a fixed vehicle type
//! - `Ticket` - the record of one parking stay
//! - `ParkingError` - failures of a single entry or exit operation

pub mod error;
pub mod ticket;
pub mod types;

pub use error::ParkingError;
pub use ticket::Ticket;
pub use types::{ParkingSpot, ParkingType, SpotId};
