//! System configuration parameters
//!
//! All tunable parameters for the HomeSentry system. Configuration is
//! static for the process lifetime — intervals and thresholds are not
//! re-specified at runtime.

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Network ---
    /// WiFi station SSID.
    pub wifi_ssid: heapless::String<32>,
    /// WiFi station password (empty for an open network).
    pub wifi_password: heapless::String<64>,
    /// Seconds to wait for the initial association before giving up.
    pub wifi_connect_timeout_secs: u32,

    // --- Remote consumers ---
    /// Auth token for the live dashboard bridge.
    pub dashboard_token: heapless::String<48>,
    /// Base URL of the telemetry update endpoint.
    pub telemetry_url: heapless::String<64>,
    /// Write key appended to every telemetry upload.
    pub telemetry_write_key: heapless::String<32>,

    // --- Gas alarm ---
    /// Raw ADC value (16-bit full scale) at or above which the gas level
    /// is dangerous and the buzzer alarm fires.
    pub gas_danger_threshold: u16,
    /// Buzzer pulse half-cycle: sounding window and quiet window (ms).
    pub buzzer_pulse_ms: u32,

    // --- Timing ---
    /// Full sensor evaluation period (milliseconds).
    pub sensor_period_ms: u32,
    /// Motion-only evaluation period (milliseconds).
    pub motion_period_ms: u32,
    /// Telemetry upload period (milliseconds).
    pub telemetry_period_ms: u32,
    /// Idle delay at the end of each control loop tick (milliseconds).
    pub tick_delay_ms: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Network
            wifi_ssid: heapless::String::try_from("ENTER_YOUR_SSID_HERE").unwrap_or_default(),
            wifi_password: heapless::String::try_from("ENTER_YOUR_PASSWORD_HERE")
                .unwrap_or_default(),
            wifi_connect_timeout_secs: 30,

            // Remote consumers
            dashboard_token: heapless::String::try_from("ENTER_YOUR_DASHBOARD_TOKEN_HERE")
                .unwrap_or_default(),
            telemetry_url: heapless::String::try_from("http://api.thingspeak.com/update")
                .unwrap_or_default(),
            telemetry_write_key: heapless::String::try_from("ENTER_YOUR_API_KEY_HERE")
                .unwrap_or_default(),

            // Gas alarm
            gas_danger_threshold: 15_000,
            buzzer_pulse_ms: 500,

            // Timing
            sensor_period_ms: 2_000,    // comfort sensors + gas
            motion_period_ms: 1_000,    // near-immediate presence checks
            telemetry_period_ms: 15_000, // third-party API quota
            tick_delay_ms: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = SystemConfig::default();
        assert!(c.gas_danger_threshold > 0);
        assert!(c.buzzer_pulse_ms > 0);
        assert!(c.tick_delay_ms > 0);
        assert!(c.wifi_connect_timeout_secs > 0);
        assert!(!c.telemetry_url.is_empty());
    }

    #[test]
    fn timing_ratios_make_sense() {
        let c = SystemConfig::default();
        assert!(
            c.motion_period_ms < c.sensor_period_ms,
            "motion must be checked more often than comfort sensors"
        );
        assert!(
            c.sensor_period_ms < c.telemetry_period_ms,
            "remote reporting must be rate-limited below sensor cadence"
        );
        assert!(
            c.tick_delay_ms < c.motion_period_ms,
            "loop tick must be finer than the fastest activity period"
        );
    }

    #[test]
    fn pulse_cycle_fits_inside_sensor_period() {
        let c = SystemConfig::default();
        // One full pulse cycle (sounding + quiet) must complete before the
        // next evaluation can re-arm the alarm.
        assert!(2 * c.buzzer_pulse_ms <= c.sensor_period_ms);
    }

    #[test]
    fn serde_roundtrip() {
        let c = SystemConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: SystemConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c.gas_danger_threshold, c2.gas_danger_threshold);
        assert_eq!(c.sensor_period_ms, c2.sensor_period_ms);
        assert_eq!(c.wifi_ssid, c2.wifi_ssid);
    }
}
