//! Driven adapters — concrete implementations of the port traits.

pub mod dashboard;
pub mod hardware;
pub mod log_sink;
pub mod telemetry;
pub mod time;
pub mod wifi;
