//! Single-colour indicator LED driver.
//!
//! One instance per LED (status, motion, flame), each bound to its GPIO.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real GPIO via hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::error::ActuatorFault;

pub struct LedDriver {
    gpio: i32,
    lit: bool,
}

impl LedDriver {
    pub fn new(gpio: i32) -> Self {
        Self { gpio, lit: false }
    }

    pub fn set(&mut self, on: bool) -> Result<(), ActuatorFault> {
        if hw_init::gpio_write(self.gpio, on) != 0 {
            return Err(ActuatorFault::GpioWriteFailed);
        }
        self.lit = on;
        Ok(())
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_commanded_level() {
        let mut led = LedDriver::new(11);
        assert!(!led.is_lit());
        led.set(true).unwrap();
        assert!(led.is_lit());
        led.set(false).unwrap();
        assert!(!led.is_lit());
    }
}
