//! Interactive console menu around the parking service
//!
//! One loop iteration handles one operator choice. A failed entry or exit is
//! reported and the menu comes back; only option 3 or end of input stops it.

use crate::domain::error::ParkingError;
use crate::io::input::InputSource;
use crate::services::parking_service::{EntryOutcome, ParkingService};
use std::io::{self, Write};
use tracing::info;

const MENU: &[&str] = &[
    "Please select an option. Simply enter the number to choose an action",
    "1 New Vehicle Entering - Allocate Parking Space",
    "2 Vehicle Exiting - Generate Ticket Price",
    "3 Shutdown System",
];

/// Run the menu until shutdown. Only errors writing to `out` are returned.
pub fn run<I: InputSource, W: Write>(service: &mut ParkingService<I>, out: &mut W) -> io::Result<()> {
    writeln!(out, "Welcome to Parking System!")?;

    loop {
        for line in MENU {
            writeln!(out, "{line}")?;
        }
        out.flush()?;

        let selection = match service.input_mut().read_selection() {
            Ok(selection) => selection,
            Err(ParkingError::EndOfInput) => break,
            Err(_) => {
                unsupported_option(out)?;
                continue;
            }
        };

        match selection {
            1 => {
                if !incoming(service, out)? {
                    break;
                }
            }
            2 => {
                if !exiting(service, out)? {
                    break;
                }
            }
            3 => {
                writeln!(out, "Exiting from the system!")?;
                break;
            }
            _ => unsupported_option(out)?,
        }
    }

    info!("shell_shutdown");
    service.metrics().report().log();
    out.flush()
}

fn unsupported_option<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "Unsupported option. Please enter a number corresponding to the provided menu")
}

/// Returns false when input has run out
fn incoming<I: InputSource, W: Write>(service: &mut ParkingService<I>, out: &mut W) -> io::Result<bool> {
    match service.process_incoming_vehicle() {
        Ok(EntryOutcome::Parked { spot_id, ticket }) => {
            writeln!(out, "Generated Ticket and saved in DB")?;
            writeln!(out, "Please park your vehicle in spot number:{spot_id}")?;
            writeln!(
                out,
                "Recorded in-time for vehicle number:{} is:{}",
                ticket.vehicle_reg_number(),
                ticket.in_time().format("%Y-%m-%d %H:%M:%S UTC")
            )?;
        }
        Ok(EntryOutcome::AlreadyParked { vehicle_reg_number }) => {
            writeln!(out, "Vehicle {vehicle_reg_number} is already parked")?;
        }
        Err(ParkingError::EndOfInput) => return Ok(false),
        Err(e) => writeln!(out, "Unable to process incoming vehicle: {e}")?,
    }
    Ok(true)
}

/// Returns false when input has run out
fn exiting<I: InputSource, W: Write>(service: &mut ParkingService<I>, out: &mut W) -> io::Result<bool> {
    match service.process_exiting_vehicle() {
        Ok(receipt) => {
            if receipt.recurring {
                writeln!(
                    out,
                    "Welcome back! As a recurring user of our parking lot, you'll benefit from a {:.0}% discount.",
                    service.fares().recurring_discount() * 100.0
                )?;
            }
            writeln!(out, "Please pay the parking fare:{:.2}", receipt.price)?;
            writeln!(
                out,
                "Recorded out-time for vehicle number:{} is:{}",
                receipt.vehicle_reg_number,
                receipt.out_time.format("%Y-%m-%d %H:%M:%S UTC")
            )?;
        }
        Err(ParkingError::EndOfInput) => return Ok(false),
        Err(e) => writeln!(out, "Unable to update ticket information. Error occurred: {e}")?,
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::config::Config;
    use crate::infra::metrics::Metrics;
    use crate::io::input::ConsoleInput;
    use crate::io::store::{MemoryStore, TicketStore};
    use crate::services::fare_calculator::FareCalculator;
    use std::io::{Cursor, Sink};
    use std::sync::Arc;

    fn run_script(script: &str) -> (String, Arc<MemoryStore>, Arc<Metrics>) {
        let store = Arc::new(MemoryStore::new(Config::default().spot_layout()));
        let metrics = Arc::new(Metrics::new());
        let input = ConsoleInput::new(Cursor::new(script.as_bytes().to_vec()), io::sink());
        let mut service: ParkingService<ConsoleInput<Cursor<Vec<u8>>, Sink>> = ParkingService::new(
            input,
            store.clone(),
            store.clone(),
            FareCalculator::new(&Config::default()),
            metrics.clone(),
        );

        let mut out = Vec::new();
        run(&mut service, &mut out).unwrap();
        (String::from_utf8(out).unwrap(), store, metrics)
    }

    #[test]
    fn test_park_and_leave() {
        let (out, store, metrics) = run_script("1\nABCDEF\n1\n2\nABCDEF\n3\n");

        assert!(out.starts_with("Welcome to Parking System!"));
        assert!(out.contains("Please park your vehicle in spot number:1"));
        assert!(out.contains("Recorded in-time for vehicle number:ABCDEF"));
        assert!(out.contains("Please pay the parking fare:0.00"));
        assert!(out.contains("Recorded out-time for vehicle number:ABCDEF"));
        assert!(out.contains("Exiting from the system!"));
        assert!(!out.contains("Welcome back!"));

        assert!(!store.is_currently_parked("ABCDEF"));
        assert_eq!(metrics.report().entries_total, 1);
        assert_eq!(metrics.report().exits_total, 1);
    }

    #[test]
    fn test_recurring_vehicle_is_welcomed_back() {
        let (out, _, _) = run_script("1\nABCDEF\n1\n2\nABCDEF\n1\nABCDEF\n2\n2\nABCDEF\n3\n");
        assert!(out.contains("Welcome back! As a recurring user of our parking lot, you'll benefit from a 5% discount."));
    }

    #[test]
    fn test_failures_do_not_stop_the_menu() {
        let (out, store, metrics) = run_script("7\nabc\n2\nNOPE\n1\nABCDEF\n9\n1\nABCDEF\n2\n3\n");

        assert_eq!(out.matches("Unsupported option").count(), 2);
        assert!(out.contains("Unable to update ticket information"));
        assert!(out.contains("Unable to process incoming vehicle"));
        // Second attempt with a valid type succeeded
        assert!(out.contains("Please park your vehicle in spot number:4"));
        assert!(store.is_currently_parked("ABCDEF"));
        assert_eq!(metrics.report().failures_total, 2);
    }

    #[test]
    fn test_already_parked_message() {
        let (out, _, metrics) = run_script("1\nABCDEF\n1\n1\nABCDEF\n3\n");
        assert!(out.contains("Vehicle ABCDEF is already parked"));
        assert_eq!(metrics.report().rejected_entries_total, 1);
    }

    #[test]
    fn test_end_of_input_shuts_down() {
        let (out, _, _) = run_script("1\nABCDEF\n");
        assert!(out.contains("Welcome to Parking System!"));
        assert!(!out.contains("Exiting from the system!"));
    }
}
