//! Configuration loading from TOML files
//!
//! The file path comes from the command line (`--config`, `CONFIG_FILE`,
//! default `config/dev.toml`). A file that fails to read, parse or validate
//! is rejected and the caller falls back to defaults.

use crate::domain::types::{ParkingSpot, ParkingType, SpotId};
use anyhow::{ensure, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Facility identifier used in logs
    #[serde(default = "default_site_id")]
    pub id: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self { id: default_site_id() }
    }
}

fn default_site_id() -> String {
    "parkit".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct FaresConfig {
    /// Hourly rate per spot type, keyed by type name (e.g. CAR = 1.5)
    #[serde(default = "default_hourly_rates")]
    pub hourly: HashMap<String, f64>,
    /// Free period at the start of every stay
    #[serde(default = "default_grace_minutes")]
    pub grace_minutes: u32,
    /// Discount fraction for returning vehicles (0.05 = 5%)
    #[serde(default = "default_recurring_discount")]
    pub recurring_discount: f64,
}

impl Default for FaresConfig {
    fn default() -> Self {
        Self {
            hourly: default_hourly_rates(),
            grace_minutes: default_grace_minutes(),
            recurring_discount: default_recurring_discount(),
        }
    }
}

fn default_hourly_rates() -> HashMap<String, f64> {
    HashMap::from([("CAR".to_string(), 1.5), ("BIKE".to_string(), 1.0)])
}

fn default_grace_minutes() -> u32 {
    30
}

fn default_recurring_discount() -> f64 {
    0.05
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotsConfig {
    /// Number of car spots (ids 1..=car)
    #[serde(default = "default_car_spots")]
    pub car: u32,
    /// Number of bike spots (ids follow the car spots)
    #[serde(default = "default_bike_spots")]
    pub bike: u32,
}

impl Default for SpotsConfig {
    fn default() -> Self {
        Self { car: default_car_spots(), bike: default_bike_spots() }
    }
}

fn default_car_spots() -> u32 {
    3
}

fn default_bike_spots() -> u32 {
    2
}

#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
    /// Enable the closed-ticket ledger
    #[serde(default = "default_ledger_enabled")]
    pub enabled: bool,
    /// File path for closed tickets (JSONL format)
    #[serde(default = "default_ledger_file")]
    pub file: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self { enabled: default_ledger_enabled(), file: default_ledger_file() }
    }
}

fn default_ledger_enabled() -> bool {
    true
}

fn default_ledger_file() -> String {
    "tickets.jsonl".to_string()
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TomlConfig {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub fares: FaresConfig,
    #[serde(default)]
    pub spots: SpotsConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Main configuration struct used throughout the application
#[derive(Debug, Clone)]
pub struct Config {
    site_id: String,
    hourly_rates: HashMap<ParkingType, f64>,
    grace_minutes: u32,
    recurring_discount: f64,
    car_spots: u32,
    bike_spots: u32,
    ledger_enabled: bool,
    ledger_file: String,
    config_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), "default".to_string())
    }
}

impl Config {
    fn from_toml(toml_config: TomlConfig, config_file: String) -> Self {
        // Convert rate keys from type names; unknown names are dropped
        let mut hourly_rates = HashMap::new();
        for (key, rate) in toml_config.fares.hourly {
            match key.parse::<ParkingType>() {
                Ok(parking_type) => {
                    hourly_rates.insert(parking_type, rate);
                }
                Err(_) => warn!(parking_type = %key, "fare_rate_unknown_type_ignored"),
            }
        }

        Self {
            site_id: toml_config.site.id,
            hourly_rates,
            grace_minutes: toml_config.fares.grace_minutes,
            recurring_discount: toml_config.fares.recurring_discount,
            car_spots: toml_config.spots.car,
            bike_spots: toml_config.spots.bike,
            ledger_enabled: toml_config.ledger.enabled,
            ledger_file: toml_config.ledger.file,
            config_file,
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let toml_config: TomlConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        let config = Self::from_toml(toml_config, path.display().to_string());
        config
            .validate()
            .with_context(|| format!("Invalid fares in config file {}", path.display()))?;
        Ok(config)
    }

    /// Fare settings must never produce a negative price, and a car must
    /// cost more per hour than a bike
    fn validate(&self) -> anyhow::Result<()> {
        for (parking_type, rate) in &self.hourly_rates {
            ensure!(
                rate.is_finite() && *rate >= 0.0,
                "hourly rate for {parking_type} must be a non-negative number, got {rate}"
            );
        }
        if let (Some(car), Some(bike)) =
            (self.hourly_rate(ParkingType::Car), self.hourly_rate(ParkingType::Bike))
        {
            ensure!(car > bike, "CAR rate ({car}) must be greater than BIKE rate ({bike})");
        }
        ensure!(
            (0.0..=1.0).contains(&self.recurring_discount),
            "recurring_discount must be within [0, 1], got {}",
            self.recurring_discount
        );
        Ok(())
    }

    /// Load configuration from an explicit path, falling back to defaults
    pub fn load_from_path(path: &str) -> Self {
        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %format!("{e:#}"), "config_load_failed_using_defaults");
                Self::default()
            }
        }
    }

    /// Spot layout: car spots first, then bike spots, ids starting at 1
    pub fn spot_layout(&self) -> Vec<ParkingSpot> {
        let cars = (1..=self.car_spots).map(|id| ParkingSpot::new(SpotId(id), ParkingType::Car, true));
        let bikes = (1..=self.bike_spots)
            .map(|n| ParkingSpot::new(SpotId(self.car_spots + n), ParkingType::Bike, true));
        cars.chain(bikes).collect()
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    pub fn hourly_rates(&self) -> &HashMap<ParkingType, f64> {
        &self.hourly_rates
    }

    pub fn hourly_rate(&self, parking_type: ParkingType) -> Option<f64> {
        self.hourly_rates.get(&parking_type).copied()
    }

    pub fn grace_minutes(&self) -> u32 {
        self.grace_minutes
    }

    pub fn recurring_discount(&self) -> f64 {
        self.recurring_discount
    }

    pub fn car_spots(&self) -> u32 {
        self.car_spots
    }

    pub fn bike_spots(&self) -> u32 {
        self.bike_spots
    }

    pub fn ledger_enabled(&self) -> bool {
        self.ledger_enabled
    }

    pub fn ledger_file(&self) -> &str {
        &self.ledger_file
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    /// Builder method for tests to replace the rate table
    #[cfg(test)]
    pub fn with_hourly_rates(mut self, rates: HashMap<ParkingType, f64>) -> Self {
        self.hourly_rates = rates;
        self
    }
}
