//! Ticket ledger - append-only record of closed tickets
//!
//! Tickets are written in JSONL format (one JSON object per line) to the
//! file specified in config. The ledger is replayed at startup so that
//! returning vehicles keep their recurring status across restarts.

use crate::domain::ticket::Ticket;
use anyhow::Context;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Append-only writer/reader for closed tickets
pub struct TicketLedger {
    file_path: String,
}

impl TicketLedger {
    pub fn new(file_path: &str) -> Self {
        info!(file_path = %file_path, "ticket_ledger_initialized");
        Self { file_path: file_path.to_string() }
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// Append a ticket to the ledger
    /// Returns true if successful, false otherwise
    pub fn append(&self, ticket: &Ticket) -> bool {
        let json = match serde_json::to_string(ticket) {
            Ok(json) => json,
            Err(e) => {
                error!(ticket_id = %ticket.id(), error = %e, "ticket_serialize_failed");
                return false;
            }
        };

        match self.append_line(&json) {
            Ok(()) => {
                info!(
                    ticket_id = %ticket.id(),
                    vehicle = %ticket.vehicle_reg_number(),
                    price = %ticket.price(),
                    "ticket_ledgered"
                );
                true
            }
            Err(e) => {
                error!(ticket_id = %ticket.id(), error = %e, "ticket_ledger_write_failed");
                false
            }
        }
    }

    /// Append a line to the ledger file
    fn append_line(&self, line: &str) -> std::io::Result<()> {
        let path = Path::new(&self.file_path);

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;

        writeln!(file, "{}", line)?;
        debug!(file = %self.file_path, bytes = %line.len(), "ledger_written");

        Ok(())
    }

    /// Read every ticket back from the ledger.
    ///
    /// A missing file is an empty ledger. Lines that fail to parse are
    /// skipped with a warning; an unreadable file is an error.
    pub fn load(&self) -> anyhow::Result<Vec<Ticket>> {
        let path = Path::new(&self.file_path);
        if !path.exists() {
            debug!(file = %self.file_path, "ledger_missing_starting_empty");
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read ticket ledger {}", path.display()))?;

        let mut tickets = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Ticket>(line) {
                Ok(ticket) => tickets.push(ticket),
                Err(e) => warn!(line = idx + 1, error = %e, "ledger_line_skipped"),
            }
        }

        info!(file = %self.file_path, tickets = tickets.len(), "ledger_loaded");
        Ok(tickets)
    }
}
