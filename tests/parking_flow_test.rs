//! End-to-end entry/exit flows against the in-process store and ledger

use chrono::{Duration, Utc};
use parkit::domain::types::{ParkingSpot, ParkingType, SpotId};
use parkit::domain::{ParkingError, Ticket};
use parkit::infra::{Config, Metrics};
use parkit::io::{ConsoleInput, InputSource, MemoryStore, SpotStore, TicketLedger, TicketStore};
use parkit::services::{EntryOutcome, FareCalculator, ParkingService};
use std::io::{self, Cursor, Sink};
use std::sync::Arc;
use tempfile::tempdir;

type ScriptService = ParkingService<ConsoleInput<Cursor<Vec<u8>>, Sink>>;

fn service(script: &str, store: Arc<MemoryStore>) -> ScriptService {
    let input = ConsoleInput::new(Cursor::new(script.as_bytes().to_vec()), io::sink());
    ParkingService::new(
        input,
        store.clone(),
        store,
        FareCalculator::new(&Config::default()),
        Arc::new(Metrics::new()),
    )
}

fn store_with_ledger(path: &str) -> Arc<MemoryStore> {
    let ledger = TicketLedger::new(path);
    let store = MemoryStore::new(Config::default().spot_layout());
    store.restore_history(ledger.load().unwrap());
    Arc::new(store.with_ledger(ledger))
}

#[test]
fn test_parking_a_car() {
    let store = Arc::new(MemoryStore::new(Config::default().spot_layout()));
    let mut service = service("ABCDEF\n1\n", store.clone());

    let outcome = service.process_incoming_vehicle().unwrap();

    let EntryOutcome::Parked { spot_id, .. } = outcome else {
        panic!("expected the car to be parked");
    };
    let ticket = store.get_open_ticket("ABCDEF").unwrap();
    assert_eq!(ticket.vehicle_reg_number(), "ABCDEF");
    assert_eq!(ticket.spot_id(), spot_id);
    assert!(!store.get_spot(spot_id).unwrap().is_available());
    assert_eq!(store.next_available_spot(ParkingType::Car), Some(SpotId(2)));
}

#[test]
fn test_parking_lot_exit() {
    let dir = tempdir().unwrap();
    let ledger_path = dir.path().join("tickets.jsonl");
    let store = store_with_ledger(ledger_path.to_str().unwrap());
    let mut service = service("ABCDEF\n1\nABCDEF\n", store.clone());

    service.process_incoming_vehicle().unwrap();
    let receipt = service.process_exiting_vehicle().unwrap();

    // Immediate exit is inside the grace period
    assert_eq!(receipt.price, 0.0);
    let ticket = store.tickets_for("ABCDEF").pop().unwrap();
    assert_eq!(ticket.price(), 0.0);
    assert!(ticket.out_time().is_some());
    assert!(store.get_spot(receipt.spot_id).unwrap().is_available());

    let ledgered = TicketLedger::new(ledger_path.to_str().unwrap()).load().unwrap();
    assert_eq!(ledgered, vec![ticket]);
}

#[test]
fn test_recurrence_survives_restart() {
    let dir = tempdir().unwrap();
    let ledger_path = dir.path().join("tickets.jsonl");
    let path = ledger_path.to_str().unwrap();

    // First run: one short visit
    {
        let store = store_with_ledger(path);
        let mut service = service("ABCDEF\n1\nABCDEF\n", store);
        service.process_incoming_vehicle().unwrap();
        service.process_exiting_vehicle().unwrap();
    }

    // Second run: the vehicle stayed an hour and is now a recurring user
    let store = store_with_ledger(path);
    assert!(store.has_prior_closed_ticket("ABCDEF"));

    let spot = store.claim_next_available(ParkingType::Car).unwrap();
    assert!(store.save_ticket(&Ticket::open("ABCDEF", spot, Utc::now() - Duration::minutes(60))));

    let mut service = service("ABCDEF\n", store.clone());
    let receipt = service.process_exiting_vehicle().unwrap();

    assert!(receipt.recurring);
    assert_eq!(receipt.price, 1.0);
    assert_eq!(TicketLedger::new(path).load().unwrap().len(), 2);
}

#[test]
fn test_full_facility_rejects_then_accepts_after_exit() {
    let store = Arc::new(MemoryStore::new(Config::default().spot_layout()));
    let mut service = service("B1\n2\nB2\n2\nB3\n2\nB1\nB3\n2\n", store.clone());

    service.process_incoming_vehicle().unwrap();
    service.process_incoming_vehicle().unwrap();
    let err = service.process_incoming_vehicle().unwrap_err();
    assert!(matches!(err, ParkingError::NoAvailableSpot(ParkingType::Bike)));

    let receipt = service.process_exiting_vehicle().unwrap();
    assert_eq!(receipt.spot_id, SpotId(4));

    let outcome = service.process_incoming_vehicle().unwrap();
    assert!(matches!(outcome, EntryOutcome::Parked { spot_id: SpotId(4), .. }));
    assert_eq!(service.metrics().report().failures_total, 1);
}

#[test]
fn test_spot_type_is_fixed() {
    let store = MemoryStore::new(Config::default().spot_layout());
    let bogus = ParkingSpot::new(SpotId(1), ParkingType::Bike, true);
    assert!(!store.update_spot(&bogus));
    assert_eq!(store.get_spot(SpotId(1)).unwrap().parking_type(), ParkingType::Car);
}

#[test]
fn test_console_input_drives_vehicle_type() {
    let mut input = ConsoleInput::new(Cursor::new(b"2\n".to_vec()), Vec::new());
    let selection = input.read_vehicle_type_selection().unwrap();
    assert_eq!(ParkingType::from_selection(selection).unwrap(), ParkingType::Bike);
}
