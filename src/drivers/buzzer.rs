//! Piezo buzzer driver.
//!
//! A dumb on/off actuator. Pulse timing lives in the alarm engine, not
//! here — the driver never blocks.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real GPIO via hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::error::ActuatorFault;

pub struct BuzzerDriver {
    gpio: i32,
    sounding: bool,
}

impl BuzzerDriver {
    pub fn new(gpio: i32) -> Self {
        Self {
            gpio,
            sounding: false,
        }
    }

    pub fn set(&mut self, on: bool) -> Result<(), ActuatorFault> {
        if hw_init::gpio_write(self.gpio, on) != 0 {
            return Err(ActuatorFault::GpioWriteFailed);
        }
        self.sounding = on;
        Ok(())
    }

    pub fn is_sounding(&self) -> bool {
        self.sounding
    }
}
