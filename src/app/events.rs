//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port. Adapters on the other side
//! decide what to do with them — log to serial, record in a test, etc.

use serde::Serialize;

use crate::error::SensorFault;
use crate::state::SystemState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The control loop has started.
    Started,

    /// The climate transaction failed; the previous reading was retained.
    ClimateFault(SensorFault),

    /// Flame presence changed (true = flame detected).
    FlameChanged(bool),

    /// Motion presence changed (true = motion detected).
    MotionChanged(bool),

    /// Gas level at or above the danger threshold; the buzzer alarm was
    /// armed. Carries the raw value and its diagnostic voltage.
    GasAlarm { raw: u16, voltage: f32 },

    /// The dashboard link came up and the current state was pushed.
    DashboardConnected,

    /// Periodic full status report.
    StatusReport(StatusReport),
}

/// A point-in-time snapshot of the whole system, emitted with every
/// telemetry cycle.
#[derive(Debug, Clone, Copy)]
pub struct StatusReport {
    pub temperature_c: i32,
    pub humidity_pct: u32,
    pub gas_raw: u16,
    pub flame_active: bool,
    pub motion_active: bool,
    pub status_led: bool,
    pub motion_led: bool,
    pub flame_led: bool,
}

impl StatusReport {
    pub fn from_state(state: &SystemState) -> Self {
        Self {
            temperature_c: state.temperature_c,
            humidity_pct: state.humidity_pct,
            gas_raw: state.gas_raw,
            flame_active: state.flame_active,
            motion_active: state.motion_active,
            status_led: state.actuators.status_led,
            motion_led: state.actuators.motion_led,
            flame_led: state.actuators.flame_led,
        }
    }
}

/// The telemetry upload body. Field names follow the backend's fixed
/// five-field channel layout; booleans are encoded as 0/1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TelemetryReport {
    #[serde(rename = "field1")]
    pub temperature_c: i32,
    #[serde(rename = "field2")]
    pub humidity_pct: u32,
    #[serde(rename = "field3")]
    pub gas_raw: u16,
    #[serde(rename = "field4")]
    pub flame: u8,
    #[serde(rename = "field5")]
    pub motion: u8,
}

impl TelemetryReport {
    pub fn from_state(state: &SystemState) -> Self {
        Self {
            temperature_c: state.temperature_c,
            humidity_pct: state.humidity_pct,
            gas_raw: state.gas_raw,
            flame: u8::from(state.flame_active),
            motion: u8::from(state.motion_active),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn telemetry_report_uses_backend_field_names() {
        let mut state = SystemState::new();
        state.temperature_c = 23;
        state.humidity_pct = 41;
        state.gas_raw = 512;
        state.flame_active = true;

        let json = serde_json::to_value(TelemetryReport::from_state(&state)).unwrap();
        assert_eq!(json["field1"], 23);
        assert_eq!(json["field2"], 41);
        assert_eq!(json["field3"], 512);
        assert_eq!(json["field4"], 1);
        assert_eq!(json["field5"], 0);
    }
}
