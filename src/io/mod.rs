//! IO modules - external collaborators
//!
//! This module contains everything the parking service talks to:
//! - `store` - Spot and ticket store interfaces and the in-process store
//! - `ticket_ledger` - Closed tickets to file (JSONL format)
//! - `input` - Operator input (vehicle type, registration number)
//! - `shell` - Interactive console menu

pub mod input;
pub mod shell;
pub mod store;
pub mod ticket_ledger;

// Re-export commonly used types
pub use input::{ConsoleInput, InputSource};
pub use store::{MemoryStore, SpotStore, TicketStore};
pub use ticket_ledger::TicketLedger;
