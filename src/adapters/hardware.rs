//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and all actuator drivers, exposing them through
//! [`SensorPort`] and [`ActuatorPort`]. This is the only module in the
//! system that touches actual hardware. On non-espidf targets, the
//! underlying drivers use cfg-gated simulation stubs.

use crate::app::ports::{Actuator, ActuatorPort, ClimateReading, SensorPort};
use crate::drivers::buzzer::BuzzerDriver;
use crate::drivers::led::LedDriver;
use crate::error::{ActuatorFault, SensorFault};
use crate::sensors::SensorHub;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    sensor_hub: SensorHub,
    status_led: LedDriver,
    motion_led: LedDriver,
    flame_led: LedDriver,
    buzzer: BuzzerDriver,
}

impl HardwareAdapter {
    pub fn new(
        sensor_hub: SensorHub,
        status_led: LedDriver,
        motion_led: LedDriver,
        flame_led: LedDriver,
        buzzer: BuzzerDriver,
    ) -> Self {
        Self {
            sensor_hub,
            status_led,
            motion_led,
            flame_led,
            buzzer,
        }
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_climate(&mut self) -> Result<ClimateReading, SensorFault> {
        self.sensor_hub.read_climate()
    }

    fn read_flame(&mut self) -> bool {
        self.sensor_hub.read_flame()
    }

    fn read_motion(&mut self) -> bool {
        self.sensor_hub.read_motion()
    }

    fn read_gas(&mut self) -> u16 {
        self.sensor_hub.read_gas()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set(&mut self, actuator: Actuator, on: bool) -> Result<(), ActuatorFault> {
        match actuator {
            Actuator::StatusLed => self.status_led.set(on),
            Actuator::MotionLed => self.motion_led.set(on),
            Actuator::FlameLed => self.flame_led.set(on),
            Actuator::Buzzer => self.buzzer.set(on),
        }
    }
}
