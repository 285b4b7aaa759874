//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, the dashboard bridge, the telemetry
//! uplink, event sinks) implement these traits. The
//! [`AppService`](super::service::AppService) consumes them via generics, so
//! the domain core never touches hardware or sockets directly.

use crate::error::{ActuatorFault, NetworkFault, SensorFault};

use super::commands::DashboardCommand;
use super::events::{AppEvent, TelemetryReport};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// One successful climate transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClimateReading {
    /// Temperature in whole °C (the sensor reports integer degrees).
    pub temperature_c: i32,
    /// Relative humidity in whole %.
    pub humidity_pct: u32,
}

/// Read-side port: the domain calls this to obtain sensor data.
///
/// Only the climate transaction is fallible (checksum-validated one-wire
/// protocol). Flame, motion and gas are plain digital/analog samples.
pub trait SensorPort {
    /// Perform one climate transaction. May fail transiently; the caller
    /// retains the previous reading on error.
    fn read_climate(&mut self) -> Result<ClimateReading, SensorFault>;

    /// Sample the flame sensor. `true` = flame present (the adapter folds
    /// in the active-low wiring).
    fn read_flame(&mut self) -> bool;

    /// Sample the motion sensor. `true` = motion present (active-high).
    fn read_motion(&mut self) -> bool;

    /// Sample the gas sensor. Raw conversion scaled to 16-bit full range.
    fn read_gas(&mut self) -> u16;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// The four local outputs the domain can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actuator {
    /// Dashboard-controlled status LED.
    StatusLed,
    /// Motion indicator LED.
    MotionLed,
    /// Flame indicator LED.
    FlameLed,
    /// Gas alarm buzzer.
    Buzzer,
}

impl Actuator {
    /// Every actuator, in board silk order. The fail-safe sweep walks
    /// this list.
    pub const ALL: [Actuator; 4] = [
        Actuator::StatusLed,
        Actuator::MotionLed,
        Actuator::FlameLed,
        Actuator::Buzzer,
    ];
}

impl core::fmt::Display for Actuator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::StatusLed => write!(f, "status LED"),
            Self::MotionLed => write!(f, "motion LED"),
            Self::FlameLed => write!(f, "flame LED"),
            Self::Buzzer => write!(f, "buzzer"),
        }
    }
}

/// Write-side port: the domain calls this to command actuators.
///
/// Local GPIO is not expected to fail; the core logs an error and carries
/// on when it does. The `Result` exists so the fail-safe path can attempt
/// every actuator even when one write errors.
pub trait ActuatorPort {
    /// Drive one actuator to the given level. Synchronous.
    fn set(&mut self, actuator: Actuator, on: bool) -> Result<(), ActuatorFault>;
}

// ───────────────────────────────────────────────────────────────
// Dashboard port (driven adapter: domain ↔ live dashboard)
// ───────────────────────────────────────────────────────────────

/// Fixed virtual channels of the dashboard protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum VirtualChannel {
    /// Inbound: single-bit status LED command.
    StatusLedCmd = 0,
    /// Outbound: temperature (°C).
    Temperature = 1,
    /// Outbound: relative humidity (%).
    Humidity = 2,
    /// Outbound: raw gas level.
    GasLevel = 3,
    /// Outbound: flame presence as 0/1.
    Flame = 4,
    /// Outbound: motion presence as 0/1.
    Motion = 5,
}

/// Bidirectional port to the live dashboard.
///
/// Push failures are transient: the domain logs them and continues; the
/// next evaluation's push is the retry. Inbound commands are buffered by
/// the adapter (at most one pending per channel) and drained once per tick
/// via [`poll_command`](DashboardPort::poll_command) — commands are never
/// applied from inside an I/O callback.
pub trait DashboardPort {
    /// Push one value to an outbound virtual channel.
    fn push(&mut self, channel: VirtualChannel, value: i32) -> Result<(), NetworkFault>;

    /// Take the next pending inbound command, if any. Non-blocking.
    fn poll_command(&mut self) -> Option<DashboardCommand>;
}

// ───────────────────────────────────────────────────────────────
// Telemetry port (driven adapter: domain → time-series backend)
// ───────────────────────────────────────────────────────────────

/// Outbound port to the telemetry backend.
///
/// One synchronous upload per call. Any failure is non-fatal; there is no
/// immediate retry or backoff — the next scheduled upload is the retry.
pub trait TelemetryPort {
    /// Upload one report.
    fn upload(&mut self, report: &TelemetryReport) -> Result<(), NetworkFault>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / reporting)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port. Adapters
/// decide where they go (serial log in production, a `Vec` in tests).
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}
