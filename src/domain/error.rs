//! Failures surfaced by fare calculation and the parking service

use crate::domain::types::ParkingType;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// An error that aborts a single entry or exit operation.
#[derive(Debug, Error)]
pub enum ParkingError {
    /// Out time missing, or earlier than the in time.
    #[error("Out time provided is incorrect: in={in_time}, out={out_time:?}")]
    InvalidTiming { in_time: DateTime<Utc>, out_time: Option<DateTime<Utc>> },

    /// No hourly rate is known for this spot type.
    #[error("Unknown parking type: {0}")]
    UnknownSpotType(String),

    /// Vehicle type menu selection outside the offered choices.
    #[error("Entered input is invalid: vehicle type selection {0}")]
    UnknownVehicleType(i32),

    #[error("Error fetching parking number: no {0} spot available, parking might be full")]
    NoAvailableSpot(ParkingType),

    #[error("No open ticket for vehicle {0}")]
    NoOpenTicket(String),

    /// A store refused or failed to record a change.
    #[error("Unable to persist {0}")]
    Persistence(String),

    /// The input source could not supply a usable value.
    #[error("Invalid input: {0}")]
    Input(String),

    /// The input source has nothing more to read.
    #[error("End of input")]
    EndOfInput,
}

impl From<std::io::Error> for ParkingError {
    fn from(e: std::io::Error) -> Self {
        ParkingError::Input(e.to_string())
    }
}
