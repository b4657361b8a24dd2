//! Integration tests for configuration loading

use parkit::domain::types::{ParkingType, SpotId};
use parkit::infra::Config;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();

    let config_content = r#"
[site]
id = "test-site"

[fares]
grace_minutes = 15
recurring_discount = 0.10

[fares.hourly]
CAR = 3.0
BIKE = 1.25

[spots]
car = 10
bike = 4

[ledger]
enabled = false
file = "/var/lib/parkit/tickets.jsonl"
"#;

    temp_file.write_all(config_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();

    assert_eq!(config.site_id(), "test-site");
    assert_eq!(config.grace_minutes(), 15);
    assert_eq!(config.recurring_discount(), 0.10);
    assert_eq!(config.hourly_rate(ParkingType::Car), Some(3.0));
    assert_eq!(config.hourly_rate(ParkingType::Bike), Some(1.25));
    assert_eq!(config.car_spots(), 10);
    assert_eq!(config.bike_spots(), 4);
    assert!(!config.ledger_enabled());
    assert_eq!(config.ledger_file(), "/var/lib/parkit/tickets.jsonl");

    let layout = config.spot_layout();
    assert_eq!(layout.len(), 14);
    assert_eq!(layout[10].id(), SpotId(11));
    assert_eq!(layout[10].parking_type(), ParkingType::Bike);
}

#[test]
fn test_partial_file_uses_defaults() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[spots]\ncar = 1\n").unwrap();
    temp_file.flush().unwrap();

    let config = Config::from_file(temp_file.path()).unwrap();

    assert_eq!(config.car_spots(), 1);
    assert_eq!(config.bike_spots(), 2);
    assert_eq!(config.hourly_rate(ParkingType::Car), Some(1.5));
    assert_eq!(config.grace_minutes(), 30);
}

#[test]
fn test_invalid_file_is_an_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"[spots]\ncar = \"many\"\n").unwrap();
    temp_file.flush().unwrap();

    let err = Config::from_file(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test]
fn test_load_from_path_fallback() {
    let config = Config::load_from_path("/nonexistent/config.toml");
    assert_eq!(config.site_id(), "parkit");
    assert_eq!(config.car_spots(), 3);
    assert_eq!(config.hourly_rate(ParkingType::Bike), Some(1.0));
    assert_eq!(config.config_file(), "default");
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

#[test]
fn test_negative_rate_is_rejected() {
    let temp_file = write_config("[fares.hourly]\nCAR = -2.0\nBIKE = -3.0\n");

    let err = Config::from_file(temp_file.path()).unwrap_err();
    assert!(err.to_string().contains("Invalid fares in config file"));
    assert!(format!("{err:#}").contains("non-negative"));
}

#[test]
fn test_bike_rate_not_below_car_rate_is_rejected() {
    let temp_file = write_config("[fares.hourly]\nCAR = 1.0\nBIKE = 1.0\n");

    let err = Config::from_file(temp_file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("must be greater than BIKE rate"));
}

#[test]
fn test_discount_out_of_range_is_rejected() {
    for discount in ["1.5", "-0.1"] {
        let temp_file = write_config(&format!("[fares]\nrecurring_discount = {discount}\n"));

        let err = Config::from_file(temp_file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("recurring_discount must be within [0, 1]"));
    }
}

#[test]
fn test_invalid_fares_fall_back_to_defaults() {
    let temp_file = write_config(
        "[fares]\nrecurring_discount = 1.5\n\n[fares.hourly]\nCAR = -2.0\nBIKE = 5.0\n",
    );

    let config = Config::load_from_path(temp_file.path().to_str().unwrap());
    assert_eq!(config.config_file(), "default");
    assert_eq!(config.hourly_rate(ParkingType::Car), Some(1.5));
    assert_eq!(config.hourly_rate(ParkingType::Bike), Some(1.0));
    assert_eq!(config.recurring_discount(), 0.05);
}

#[test]
fn test_discount_bounds_are_accepted() {
    for discount in ["0.0", "1.0"] {
        let temp_file = write_config(&format!("[fares]\nrecurring_discount = {discount}\n"));
        assert!(Config::from_file(temp_file.path()).is_ok());
    }
}
