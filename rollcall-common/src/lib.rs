//! # rollcall common library
//!
//! Shared code for the rollcall attendance / evacuation tracker:
//! - Person records and the in-memory roster manager
//! - Event log types
//! - Roster store contract with SQLite and HTTP implementations
//! - CSV / spreadsheet import
//! - Session (roster bound to a store, periodic refresh)
//! - Configuration loading

pub mod api;
pub mod config;
pub mod error;
pub mod events;
pub mod import;
pub mod partition;
pub mod person;
pub mod roster;
pub mod session;
pub mod store;
pub mod time;

pub use error::{Error, RemoteError, Result};
pub use events::{EventLogEntry, StatusChange};
pub use partition::Partition;
pub use person::{Age, PersonId, PersonRecord};
pub use roster::{Counts, Listing, LoadSummary, RosterManager, Row, SortKey};
pub use session::{ImportMode, RosterSession};
pub use store::{RemoteStore, RosterStore, SqliteStore};
