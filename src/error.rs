//! Unified error types for the HomeSentry firmware.
//!
//! Follows embedded best practice: a single `Error` enum that every subsystem
//! can convert into, keeping the top-level control loop's error handling
//! uniform. All variants are `Copy` so they can be cheaply passed through the
//! evaluation steps without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor transaction failed (transient, per-read).
    Sensor(SensorFault),
    /// A network push or upload failed (transient, per-cycle).
    Network(NetworkFault),
    /// An actuator write failed.
    Actuator(ActuatorFault),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Network(e) => write!(f, "network: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor faults
// ---------------------------------------------------------------------------

/// Transient failure of the one-wire climate sensor transaction.
///
/// The flame/motion/gas reads are plain digital/analog samples and cannot
/// fail; only the checksum-validated climate protocol carries this error.
/// The caller recovers by retaining the previous reading — a `SensorFault`
/// never propagates past the evaluation step that observed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorFault {
    /// The 40-bit frame arrived but its checksum byte did not match.
    ChecksumMismatch,
    /// The sensor did not answer the start signal within the protocol window.
    Timeout,
    /// The data line never returned to idle (stuck bus or wiring fault).
    BusFault,
}

impl fmt::Display for SensorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChecksumMismatch => write!(f, "checksum mismatch"),
            Self::Timeout => write!(f, "read timeout"),
            Self::BusFault => write!(f, "bus fault"),
        }
    }
}

impl From<SensorFault> for Error {
    fn from(e: SensorFault) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Network faults
// ---------------------------------------------------------------------------

/// Transient failure of an outbound network operation.
///
/// Contained within the reporting component that raised it: the affected
/// push/upload is skipped for one cycle and the next scheduled attempt is
/// the retry. Never stops the control loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkFault {
    /// No link is currently established.
    NotConnected,
    /// A dashboard virtual-channel push failed.
    PushFailed,
    /// The telemetry HTTP transaction failed at the transport layer.
    UploadFailed,
    /// The telemetry endpoint answered with a non-success status.
    HttpStatus(u16),
    /// The payload could not be encoded.
    EncodeFailed,
}

impl fmt::Display for NetworkFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not connected"),
            Self::PushFailed => write!(f, "channel push failed"),
            Self::UploadFailed => write!(f, "upload transport failed"),
            Self::HttpStatus(code) => write!(f, "HTTP status {code}"),
            Self::EncodeFailed => write!(f, "payload encode failed"),
        }
    }
}

impl From<NetworkFault> for Error {
    fn from(e: NetworkFault) -> Self {
        Self::Network(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator faults
// ---------------------------------------------------------------------------

/// Failure of a local actuator write.
///
/// Local GPIO is not expected to fail in practice; the variant exists so the
/// fail-safe path can attempt every actuator even when one write errors, and
/// so the HAL's fallible pin writes have a typed destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorFault {
    /// GPIO level write was rejected by the HAL.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl From<ActuatorFault> for Error {
    fn from(e: ActuatorFault) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
