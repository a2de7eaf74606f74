//! HTTP API shared between rollcall-server and the remote store facade

pub mod types;

pub use types::{AppendLogRequest, ErrorResponse, PersonPayload};

/// Default port of rollcall-server
pub const DEFAULT_PORT: u16 = 5740;
