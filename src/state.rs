//! System State — the single in-memory record of last-known sensor values
//! and derived alarm flags.
//!
//! One instance is created at startup and owned by the control loop, which
//! lends mutable access to each evaluation step for the duration of one
//! call. The reporting components read it; only the sensor evaluation steps
//! and the dashboard command handler write it. There is no persistence and
//! no explicit destruction — fail-safe shutdown touches actuator outputs
//! only, never this structure.

/// Mirror of the physical output levels, updated synchronously with the
/// evaluation or command that drove the corresponding pin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActuatorStates {
    /// Dashboard-controlled LED. Mutated only by inbound dashboard
    /// commands, never by sensor evaluation.
    pub status_led: bool,
    /// Mirrors `motion_active` after every motion evaluation.
    pub motion_led: bool,
    /// Mirrors `flame_active` after every flame evaluation.
    pub flame_led: bool,
}

/// Last-known sensor values and derived presence flags.
///
/// The climate fields retain their previous value across a transient read
/// fault; the digital presence flags are overwritten on every evaluation
/// (those reads cannot fail). The gas danger condition is deliberately not
/// stored — it is a stateless predicate recomputed each evaluation.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemState {
    /// Last successful climate reading: temperature in whole °C.
    pub temperature_c: i32,
    /// Last successful climate reading: relative humidity in whole %.
    pub humidity_pct: u32,
    /// Last raw gas ADC conversion, 16-bit full scale.
    pub gas_raw: u16,
    /// Flame presence derived from the most recent digital evaluation.
    pub flame_active: bool,
    /// Motion presence derived from the most recent digital evaluation.
    pub motion_active: bool,
    /// Physical output mirror.
    pub actuators: ActuatorStates,
}

impl SystemState {
    /// All-zero/false startup state.
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the LED mirrors match their sensor flags — the mirroring
    /// invariant the evaluation steps must re-establish on every pass.
    pub fn mirrors_consistent(&self) -> bool {
        self.actuators.flame_led == self.flame_active
            && self.actuators.motion_led == self.motion_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_state_is_all_off() {
        let s = SystemState::new();
        assert_eq!(s.temperature_c, 0);
        assert_eq!(s.humidity_pct, 0);
        assert_eq!(s.gas_raw, 0);
        assert!(!s.flame_active);
        assert!(!s.motion_active);
        assert_eq!(s.actuators, ActuatorStates::default());
        assert!(s.mirrors_consistent());
    }

    #[test]
    fn mirror_consistency_detects_desync() {
        let mut s = SystemState::new();
        s.flame_active = true;
        assert!(!s.mirrors_consistent());
        s.actuators.flame_led = true;
        assert!(s.mirrors_consistent());
    }
}
