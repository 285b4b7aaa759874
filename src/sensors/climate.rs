//! DHT11 humidity/temperature sensor (single-wire, checksum-validated).
//!
//! The transaction is a host start signal (data line held low), a sensor
//! response handshake, then a 40-bit frame timed by high-pulse width:
//!
//! ```text
//!  host low ≥18 ms │ release │ sensor 80 µs low + 80 µs high │ 40 bits
//!  bit: 50 µs low preamble, then ~27 µs high = 0 / ~70 µs high = 1
//!  frame: hum_int hum_dec temp_int temp_dec checksum
//! ```
//!
//! The checksum is the low byte of the sum of the first four bytes. Any
//! mismatch, a missing response, or a stuck line is reported as a
//! transient [`SensorFault`] — the caller retains its previous reading.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-bangs the protocol over the open-drain data line with
//! microsecond busy-waits (the frame lasts ~4 ms, far below the tick
//! delay). On host/test: reads from injectable statics, including a
//! one-shot fault injector for retention tests.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicI32, AtomicU32, AtomicU8, Ordering};

use crate::app::ports::ClimateReading;
use crate::error::SensorFault;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

// ── Host simulation hooks ─────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
static SIM_TEMPERATURE_C: AtomicI32 = AtomicI32::new(0);
#[cfg(not(target_os = "espidf"))]
static SIM_HUMIDITY_PCT: AtomicU32 = AtomicU32::new(0);
/// 0 = none, 1 = checksum, 2 = timeout, 3 = bus fault. Consumed by the
/// next read.
#[cfg(not(target_os = "espidf"))]
static SIM_NEXT_FAULT: AtomicU8 = AtomicU8::new(0);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_climate(temperature_c: i32, humidity_pct: u32) {
    SIM_TEMPERATURE_C.store(temperature_c, Ordering::Relaxed);
    SIM_HUMIDITY_PCT.store(humidity_pct, Ordering::Relaxed);
}

/// Make the next transaction fail with the given fault.
#[cfg(not(target_os = "espidf"))]
pub fn sim_inject_fault(fault: SensorFault) {
    let code = match fault {
        SensorFault::ChecksumMismatch => 1,
        SensorFault::Timeout => 2,
        SensorFault::BusFault => 3,
    };
    SIM_NEXT_FAULT.store(code, Ordering::Relaxed);
}

// ── Protocol timing ───────────────────────────────────────────

#[cfg(target_os = "espidf")]
const START_LOW_US: u32 = 20_000;
#[cfg(target_os = "espidf")]
const RESPONSE_TIMEOUT_US: u64 = 200;
#[cfg(target_os = "espidf")]
const BIT_TIMEOUT_US: u64 = 150;
/// High pulses wider than this are a 1-bit (~27 µs = 0, ~70 µs = 1).
#[cfg(target_os = "espidf")]
const ONE_BIT_THRESHOLD_US: u64 = 48;

// ── Sensor driver ─────────────────────────────────────────────

pub struct ClimateSensor {
    data_gpio: i32,
}

impl ClimateSensor {
    pub fn new(data_gpio: i32) -> Self {
        Self { data_gpio }
    }

    /// Perform one full transaction.
    #[cfg(target_os = "espidf")]
    pub fn read(&mut self) -> Result<ClimateReading, SensorFault> {
        let frame = self.read_frame()?;

        let sum = frame[0]
            .wrapping_add(frame[1])
            .wrapping_add(frame[2])
            .wrapping_add(frame[3]);
        if sum != frame[4] {
            return Err(SensorFault::ChecksumMismatch);
        }

        Ok(ClimateReading {
            temperature_c: i32::from(frame[2]),
            humidity_pct: u32::from(frame[0]),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read(&mut self) -> Result<ClimateReading, SensorFault> {
        match SIM_NEXT_FAULT.swap(0, Ordering::Relaxed) {
            1 => return Err(SensorFault::ChecksumMismatch),
            2 => return Err(SensorFault::Timeout),
            3 => return Err(SensorFault::BusFault),
            _ => {}
        }
        Ok(ClimateReading {
            temperature_c: SIM_TEMPERATURE_C.load(Ordering::Relaxed),
            humidity_pct: SIM_HUMIDITY_PCT.load(Ordering::Relaxed),
        })
    }

    // ── Wire protocol (device only) ───────────────────────────

    #[cfg(target_os = "espidf")]
    fn read_frame(&mut self) -> Result<[u8; 5], SensorFault> {
        // Host start signal, then release the line for the response.
        hw_init::onewire_drive_low(self.data_gpio, true);
        hw_init::delay_us(START_LOW_US);
        hw_init::onewire_drive_low(self.data_gpio, false);
        hw_init::delay_us(30);

        // Sensor handshake: 80 µs low, 80 µs high.
        self.wait_level(false, RESPONSE_TIMEOUT_US, SensorFault::Timeout)?;
        self.wait_level(true, RESPONSE_TIMEOUT_US, SensorFault::Timeout)?;
        self.wait_level(false, RESPONSE_TIMEOUT_US, SensorFault::Timeout)?;

        let mut frame = [0u8; 5];
        for bit in 0..40 {
            // 50 µs low preamble, then the width of the high pulse
            // encodes the bit value.
            self.wait_level(true, BIT_TIMEOUT_US, SensorFault::BusFault)?;
            let rise = hw_init::timestamp_us();
            self.wait_level(false, BIT_TIMEOUT_US, SensorFault::BusFault)?;
            if hw_init::timestamp_us() - rise > ONE_BIT_THRESHOLD_US {
                frame[bit / 8] |= 1 << (7 - bit % 8);
            }
        }
        Ok(frame)
    }

    /// Spin until the data line reaches `level`, failing with `fault`
    /// after `timeout_us`.
    #[cfg(target_os = "espidf")]
    fn wait_level(&self, level: bool, timeout_us: u64, fault: SensorFault) -> Result<(), SensorFault> {
        let deadline = hw_init::timestamp_us() + timeout_us;
        while hw_init::gpio_read(self.data_gpio) != level {
            if hw_init::timestamp_us() >= deadline {
                return Err(fault);
            }
        }
        Ok(())
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;
    use crate::pins;

    // One test, not several: the simulation statics are process-global
    // and parallel tests would race on the one-shot fault slot.
    #[test]
    fn sim_injection_and_one_shot_fault() {
        let mut sensor = ClimateSensor::new(pins::CLIMATE_DATA_GPIO);

        sim_set_climate(24, 55);
        let r = sensor.read().unwrap();
        assert_eq!(r.temperature_c, 24);
        assert_eq!(r.humidity_pct, 55);

        sim_inject_fault(SensorFault::ChecksumMismatch);
        assert_eq!(sensor.read(), Err(SensorFault::ChecksumMismatch));
        assert!(sensor.read().is_ok(), "fault must clear after one read");
    }
}
