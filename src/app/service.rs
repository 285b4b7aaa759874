//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the System State and the gas alarm engine, and
//! implements every evaluation step the scheduler can dispatch. All I/O
//! flows through port traits injected at call sites, making the entire
//! service testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ DashboardPort
//!                 │       AppService        │ ──▶ TelemetryPort
//! ActuatorPort ◀──│  State · Alarm          │ ──▶ EventSink
//!                 └────────────────────────┘
//! ```

use log::{error, info, warn};

use crate::alarm::GasAlarm;
use crate::config::SystemConfig;
use crate::sensors::gas;
use crate::state::SystemState;

use super::commands::DashboardCommand;
use super::events::{AppEvent, StatusReport, TelemetryReport};
use super::ports::{
    Actuator, ActuatorPort, DashboardPort, EventSink, SensorPort, TelemetryPort, VirtualChannel,
};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    state: SystemState,
    alarm: GasAlarm,
    config: SystemConfig,
}

impl AppService {
    pub fn new(config: SystemConfig) -> Self {
        let alarm = GasAlarm::new(config.buzzer_pulse_ms);
        Self {
            state: SystemState::new(),
            alarm,
            config,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Announce loop entry.
    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started);
        info!("AppService started");
    }

    /// Startup self-test: one full evaluation of every sensor and a
    /// status report, before the dashboard session exists.
    pub fn self_test(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
        now_ms: u64,
    ) {
        info!("Self-test: sampling all sensors");
        self.sample_environment(hw, sink, now_ms);
        self.evaluate_motion(hw, sink);
        sink.emit(&AppEvent::StatusReport(StatusReport::from_state(&self.state)));
    }

    // ── Evaluation steps (scheduler-dispatched) ───────────────

    /// Full sensor evaluation: climate, flame, gas — then push the
    /// refreshed state to the dashboard.
    pub fn evaluate_sensors(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        dash: &mut impl DashboardPort,
        sink: &mut impl EventSink,
        now_ms: u64,
    ) {
        self.sample_environment(hw, sink, now_ms);
        self.push_state(dash);
    }

    /// Motion-only evaluation (runs on the fast period).
    pub fn evaluate_motion(&mut self, hw: &mut (impl SensorPort + ActuatorPort), sink: &mut impl EventSink) {
        let motion = hw.read_motion();
        let changed = motion != self.state.motion_active;
        self.state.motion_active = motion;
        self.drive(hw, Actuator::MotionLed, motion);
        if changed {
            sink.emit(&AppEvent::MotionChanged(motion));
        }
    }

    /// Telemetry upload plus the full status report. A failed upload
    /// degrades this cycle only — the next scheduled cycle is the retry.
    pub fn upload_telemetry(&mut self, uplink: &mut impl TelemetryPort, sink: &mut impl EventSink) {
        let report = TelemetryReport::from_state(&self.state);
        if let Err(e) = uplink.upload(&report) {
            warn!("Telemetry: upload failed ({e}); next scheduled cycle is the retry");
        }
        sink.emit(&AppEvent::StatusReport(StatusReport::from_state(&self.state)));
    }

    // ── Dashboard servicing ───────────────────────────────────

    /// One-time full state push when the dashboard link comes up.
    pub fn on_dashboard_connected(
        &mut self,
        dash: &mut impl DashboardPort,
        sink: &mut impl EventSink,
    ) {
        self.push_state(dash);
        sink.emit(&AppEvent::DashboardConnected);
    }

    /// Drain and apply pending inbound commands. Runs at the top of
    /// every tick, before any scheduled activity.
    pub fn service_commands(&mut self, dash: &mut impl DashboardPort, hw: &mut impl ActuatorPort) {
        while let Some(cmd) = dash.poll_command() {
            match cmd {
                DashboardCommand::SetStatusLed(on) => {
                    info!("Dashboard: status LED {}", if on { "ON" } else { "OFF" });
                    self.drive(hw, Actuator::StatusLed, on);
                }
            }
        }
    }

    /// Push the five current values to their outbound channels. Push
    /// failures are logged per channel and never abort the tick.
    pub fn push_state(&mut self, dash: &mut impl DashboardPort) {
        let s = &self.state;
        let writes = [
            (VirtualChannel::Temperature, s.temperature_c),
            (VirtualChannel::Humidity, s.humidity_pct as i32),
            (VirtualChannel::GasLevel, i32::from(s.gas_raw)),
            (VirtualChannel::Flame, i32::from(s.flame_active)),
            (VirtualChannel::Motion, i32::from(s.motion_active)),
        ];
        for (channel, value) in writes {
            if let Err(e) = dash.push(channel, value) {
                warn!("Dashboard: push to channel {} failed: {e}", channel as u8);
            }
        }
    }

    // ── Alarm ─────────────────────────────────────────────────

    /// Advance the buzzer alarm state machine. Runs every tick.
    pub fn tick_alarm(&mut self, now_ms: u64, hw: &mut impl ActuatorPort) {
        self.alarm.tick(now_ms, hw);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> &SystemState {
        &self.state
    }

    /// True while a buzzer pulse cycle is in progress.
    pub fn alarm_active(&self) -> bool {
        self.alarm.cycle_in_progress()
    }

    // ── Internal ──────────────────────────────────────────────

    /// Sample climate, flame, and gas; refresh state, drive the flame
    /// LED mirror, and arm the alarm on a dangerous gas level.
    fn sample_environment(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        sink: &mut impl EventSink,
        now_ms: u64,
    ) {
        // ── Climate (fallible: retain previous reading on fault) ──
        match hw.read_climate() {
            Ok(r) => {
                self.state.temperature_c = r.temperature_c;
                self.state.humidity_pct = r.humidity_pct;
                info!(
                    "Climate: {} C, {} %",
                    r.temperature_c, r.humidity_pct
                );
            }
            Err(e) => {
                warn!("Climate: read failed ({e}), retaining previous reading");
                sink.emit(&AppEvent::ClimateFault(e));
            }
        }

        // ── Flame (stateless, mirrored to its LED) ────────────
        let flame = hw.read_flame();
        let flame_changed = flame != self.state.flame_active;
        self.state.flame_active = flame;
        self.drive(hw, Actuator::FlameLed, flame);
        if flame_changed {
            sink.emit(&AppEvent::FlameChanged(flame));
        }

        // ── Gas (stateless predicate, side-effecting alarm) ───
        let raw = hw.read_gas();
        self.state.gas_raw = raw;
        let voltage = gas::voltage(raw);
        info!("Gas: level {raw} ({voltage:.2} V)");
        if raw >= self.config.gas_danger_threshold {
            self.alarm.arm(now_ms, hw);
            sink.emit(&AppEvent::GasAlarm { raw, voltage });
        }
    }

    /// Drive an actuator and keep the state mirror in sync. A failed
    /// write is logged; the mirror tracks the commanded level so the
    /// mirroring invariant holds for the rest of the tick.
    fn drive(&mut self, hw: &mut impl ActuatorPort, actuator: Actuator, on: bool) {
        if let Err(e) = hw.set(actuator, on) {
            error!("Actuator: {actuator} write failed: {e}");
        }
        match actuator {
            Actuator::StatusLed => self.state.actuators.status_led = on,
            Actuator::MotionLed => self.state.actuators.motion_led = on,
            Actuator::FlameLed => self.state.actuators.flame_led = on,
            Actuator::Buzzer => {}
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
