//! Sensor subsystem — individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every sensor driver. Unlike a snapshot-per-tick design,
//! the evaluation steps sample through the hub at their own cadences: the
//! climate/flame/gas group every sensor period, motion on its faster
//! period.

pub mod climate;
pub mod flame;
pub mod gas;
pub mod motion;

use crate::app::ports::ClimateReading;
use crate::error::SensorFault;
use climate::ClimateSensor;
use flame::FlameSensor;
use gas::GasSensor;
use motion::MotionSensor;

/// Aggregates all sensor drivers behind one read surface.
pub struct SensorHub {
    pub climate: ClimateSensor,
    pub flame: FlameSensor,
    pub motion: MotionSensor,
    pub gas: GasSensor,
}

impl SensorHub {
    /// Construct a new hub. Pass in pre-built drivers (built in main
    /// where peripheral ownership is established).
    pub fn new(
        climate: ClimateSensor,
        flame: FlameSensor,
        motion: MotionSensor,
        gas: GasSensor,
    ) -> Self {
        Self {
            climate,
            flame,
            motion,
            gas,
        }
    }

    /// One climate transaction. Transient failures propagate to the
    /// caller, which retains the previous reading.
    pub fn read_climate(&mut self) -> Result<ClimateReading, SensorFault> {
        self.climate.read()
    }

    pub fn read_flame(&mut self) -> bool {
        self.flame.read()
    }

    pub fn read_motion(&mut self) -> bool {
        self.motion.read()
    }

    pub fn read_gas(&mut self) -> u16 {
        self.gas.read()
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;
    use crate::pins;

    fn hub() -> SensorHub {
        SensorHub::new(
            ClimateSensor::new(pins::CLIMATE_DATA_GPIO),
            FlameSensor::new(pins::FLAME_SENSE_GPIO),
            MotionSensor::new(pins::MOTION_SENSE_GPIO),
            GasSensor::new(pins::GAS_ADC_CHANNEL),
        )
    }

    #[test]
    fn hub_folds_wiring_polarity_per_sensor() {
        let mut hub = hub();

        // Flame module is active-low: a low line means flame present.
        flame::sim_set_line_high(false);
        assert!(hub.read_flame());
        flame::sim_set_line_high(true);
        assert!(!hub.read_flame());

        // PIR is active-high.
        motion::sim_set_line_high(true);
        assert!(hub.read_motion());
        motion::sim_set_line_high(false);
        assert!(!hub.read_motion());

        gas::sim_set_gas_raw(12_345);
        assert_eq!(hub.read_gas(), 12_345);
        gas::sim_set_gas_raw(0);
    }
}
