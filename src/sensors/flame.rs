//! IR flame sensor module (digital output, active LOW).
//!
//! The module pulls its output low when it sees flame-band IR, so the
//! driver inverts the physical level. Stateless — every read is an
//! independent sample with no hysteresis or debounce.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the real GPIO. On host/test: reads an injectable
//! static holding the *physical* line level.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

/// Simulated physical line level. Idle-high (no flame) by default.
#[cfg(not(target_os = "espidf"))]
static SIM_LINE_HIGH: AtomicBool = AtomicBool::new(true);

/// Set the simulated physical line level (false = flame present).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_line_high(high: bool) {
    SIM_LINE_HIGH.store(high, Ordering::Relaxed);
}

pub struct FlameSensor {
    gpio: i32,
}

impl FlameSensor {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }

    /// `true` = flame present (physical low).
    #[cfg(target_os = "espidf")]
    pub fn read(&mut self) -> bool {
        !hw_init::gpio_read(self.gpio)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read(&mut self) -> bool {
        let _ = self.gpio;
        !SIM_LINE_HIGH.load(Ordering::Relaxed)
    }
}
