//! Gas alarm engine.
//!
//! Replaces a blocking buzzer pulse with a tick-driven state machine so the
//! control loop never stalls while the alarm sounds. One pulse cycle is a
//! sounding window followed by an equal quiet window:
//!
//! ```text
//!  arm()            t + pulse_ms       t + 2·pulse_ms
//!    │ buzzer HIGH      │ buzzer LOW        │
//!    ▼──────────────────▼───────────────────▼
//!    Sounding           Quiet               Idle
//! ```
//!
//! The windows are armed-until timestamps checked once per tick. Arming
//! while a cycle is in progress is a no-op — the evaluation step re-arms
//! every pass while the gas level stays dangerous, which yields one pulse
//! cycle per evaluation with no suppression window.

use log::{error, warn};

use crate::app::ports::{Actuator, ActuatorPort};

/// Pulse cycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// No cycle in progress; buzzer low.
    Idle,
    /// Buzzer high until the embedded deadline.
    Sounding { until_ms: u64 },
    /// Buzzer low, cycle still occupying the alarm until the deadline.
    Quiet { until_ms: u64 },
}

/// Tick-driven buzzer alarm.
pub struct GasAlarm {
    phase: Phase,
    pulse_ms: u64,
}

impl GasAlarm {
    pub fn new(pulse_ms: u32) -> Self {
        Self {
            phase: Phase::Idle,
            pulse_ms: u64::from(pulse_ms),
        }
    }

    /// Start a pulse cycle: buzzer on now, off after the sounding window.
    /// No-op while a cycle is already in progress. Expired windows are
    /// folded in first, so an evaluation that lands right after a cycle
    /// ended starts a fresh pulse.
    pub fn arm(&mut self, now_ms: u64, hw: &mut impl ActuatorPort) {
        self.advance(now_ms, hw);
        if self.phase != Phase::Idle {
            return;
        }
        warn!("alarm: buzzer cycle armed ({} ms on / {} ms off)", self.pulse_ms, self.pulse_ms);
        if let Err(e) = hw.set(Actuator::Buzzer, true) {
            error!("alarm: buzzer on failed: {e}");
        }
        self.phase = Phase::Sounding {
            until_ms: now_ms + self.pulse_ms,
        };
    }

    /// Advance the state machine. Call once per control loop tick.
    pub fn tick(&mut self, now_ms: u64, hw: &mut impl ActuatorPort) {
        self.advance(now_ms, hw);
    }

    /// Close any elapsed window (one transition per call).
    fn advance(&mut self, now_ms: u64, hw: &mut impl ActuatorPort) {
        match self.phase {
            Phase::Idle => {}
            Phase::Sounding { until_ms } if now_ms >= until_ms => {
                if let Err(e) = hw.set(Actuator::Buzzer, false) {
                    error!("alarm: buzzer off failed: {e}");
                }
                self.phase = Phase::Quiet {
                    until_ms: until_ms + self.pulse_ms,
                };
            }
            Phase::Quiet { until_ms } if now_ms >= until_ms => {
                self.phase = Phase::Idle;
            }
            _ => {}
        }
    }

    /// True while the buzzer pin is driven high.
    pub fn is_sounding(&self) -> bool {
        matches!(self.phase, Phase::Sounding { .. })
    }

    /// True while a pulse cycle (sounding or quiet window) is in progress.
    pub fn cycle_in_progress(&self) -> bool {
        self.phase != Phase::Idle
    }
}
