//! Services - business logic
//!
//! This module contains the core business logic services:
//! - `fare_calculator` - Prices a closed ticket (grace period, rates, loyalty discount)
//! - `parking_service` - Vehicle entry and exit orchestration

pub mod fare_calculator;
pub mod parking_service;

// Re-export commonly used types
pub use fare_calculator::FareCalculator;
pub use parking_service::{EntryOutcome, ExitReceipt, ParkingService};
