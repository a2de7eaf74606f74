//! HTTP API handlers for rollcall-server

pub mod error;
pub mod health;
pub mod individuals;
pub mod log;

pub use error::ApiError;
pub use health::health_routes;
pub use individuals::individuals_routes;
pub use log::log_routes;
