//! Shared types for the parking facility

use crate::domain::error::ParkingError;
use serde::{Deserialize, Serialize};

/// Newtype wrapper for spot IDs to provide type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct SpotId(pub u32);

impl std::fmt::Display for SpotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of vehicle a spot accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParkingType {
    Car,
    Bike,
}

impl ParkingType {
    pub const ALL: [ParkingType; 2] = [ParkingType::Car, ParkingType::Bike];

    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            ParkingType::Car => "CAR",
            ParkingType::Bike => "BIKE",
        }
    }

    /// Map a vehicle type menu selection (1 = car, 2 = bike)
    pub fn from_selection(selection: i32) -> Result<Self, ParkingError> {
        match selection {
            1 => Ok(ParkingType::Car),
            2 => Ok(ParkingType::Bike),
            other => Err(ParkingError::UnknownVehicleType(other)),
        }
    }
}

impl std::fmt::Display for ParkingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ParkingType {
    type Err = ParkingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CAR" => Ok(ParkingType::Car),
            "BIKE" => Ok(ParkingType::Bike),
            _ => Err(ParkingError::UnknownSpotType(s.to_string())),
        }
    }
}

/// A physical parking location.
///
/// `id` and `parking_type` are fixed at creation; only availability changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkingSpot {
    id: SpotId,
    #[serde(rename = "type")]
    parking_type: ParkingType,
    available: bool,
}

impl ParkingSpot {
    #[inline]
    pub fn new(id: SpotId, parking_type: ParkingType, available: bool) -> Self {
        Self { id, parking_type, available }
    }

    #[inline]
    pub fn id(&self) -> SpotId {
        self.id
    }

    #[inline]
    pub fn parking_type(&self) -> ParkingType {
        self.parking_type
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }
}
