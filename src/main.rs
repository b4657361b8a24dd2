//! parkit - parking facility console
//!
//! Allocates spots to arriving vehicles, closes tickets on exit and
//! computes the fare owed.
//!
//! Module structure:
//! - `domain/` - Core business types (ParkingSpot, Ticket, ParkingError)
//! - `io/` - External collaborators (stores, ledger, console input, shell)
//! - `services/` - Business logic (FareCalculator, ParkingService)
//! - `infra/` - Infrastructure (Config, Metrics)

use anyhow::Context;
use clap::Parser;
use parkit::infra::{Config, Metrics};
use parkit::io::{shell, ConsoleInput, MemoryStore, TicketLedger};
use parkit::services::{FareCalculator, ParkingService};
use std::io;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

/// parkit - parking spot allocation and fare calculation
#[derive(Parser, Debug)]
#[command(name = "parkit", version, about)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, env = "CONFIG_FILE", default_value = "config/dev.toml")]
    config: String,
}

fn main() -> anyhow::Result<()> {
    // Initialize structured logging with configurable level via RUST_LOG env var
    // Logs go to stderr so the console menu owns stdout
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(UtcTime::rfc_3339())
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    info!(git_hash = %env!("GIT_HASH"), "parkit starting");

    let args = Args::parse();
    let config = Config::load_from_path(&args.config);

    info!(
        config_file = %config.config_file(),
        site_id = %config.site_id(),
        car_spots = %config.car_spots(),
        bike_spots = %config.bike_spots(),
        hourly_rates = ?config.hourly_rates(),
        grace_minutes = %config.grace_minutes(),
        recurring_discount = %config.recurring_discount(),
        ledger_enabled = %config.ledger_enabled(),
        ledger_file = %config.ledger_file(),
        "config_loaded"
    );

    let mut store = MemoryStore::new(config.spot_layout());
    if config.ledger_enabled() {
        let ledger = TicketLedger::new(config.ledger_file());
        let history = ledger
            .load()
            .with_context(|| format!("Failed to replay ticket ledger {}", ledger.file_path()))?;
        let restored = store.restore_history(history);
        info!(restored = %restored, "ticket_history_restored");
        store = store.with_ledger(ledger);
    }
    let store = Arc::new(store);

    let input = ConsoleInput::new(io::stdin().lock(), io::stdout());
    let mut service = ParkingService::new(
        input,
        store.clone(),
        store,
        FareCalculator::new(&config),
        Arc::new(Metrics::new()),
    );

    shell::run(&mut service, &mut io::stdout()).context("Console output failed")?;

    info!("parkit shutdown complete");
    Ok(())
}
