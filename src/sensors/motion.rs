//! PIR motion sensor (digital output, active HIGH).
//!
//! Stateless like the flame sensor: each read is an independent sample.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the real GPIO. On host/test: reads an injectable
//! static holding the physical line level.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

/// Simulated physical line level. Idle-low (no motion) by default.
#[cfg(not(target_os = "espidf"))]
static SIM_LINE_HIGH: AtomicBool = AtomicBool::new(false);

/// Set the simulated physical line level (true = motion present).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_line_high(high: bool) {
    SIM_LINE_HIGH.store(high, Ordering::Relaxed);
}

pub struct MotionSensor {
    gpio: i32,
}

impl MotionSensor {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }

    /// `true` = motion present (physical high).
    #[cfg(target_os = "espidf")]
    pub fn read(&mut self) -> bool {
        hw_init::gpio_read(self.gpio)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read(&mut self) -> bool {
        let _ = self.gpio;
        SIM_LINE_HIGH.load(Ordering::Relaxed)
    }
}
