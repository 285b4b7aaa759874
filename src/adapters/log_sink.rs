//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production). The periodic status report
//! renders as a multi-line block so a serial console shows the whole
//! system at a glance.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | control loop entered");
            }
            AppEvent::ClimateFault(fault) => {
                warn!("CLIMATE | read failed ({fault}), previous reading retained");
            }
            AppEvent::FlameChanged(active) => {
                if *active {
                    warn!("FLAME | ** FIRE DETECTED **");
                } else {
                    info!("FLAME | clear");
                }
            }
            AppEvent::MotionChanged(active) => {
                if *active {
                    info!("MOTION | detected");
                } else {
                    info!("MOTION | clear");
                }
            }
            AppEvent::GasAlarm { raw, voltage } => {
                warn!("GAS | DANGER: level {raw} ({voltage:.2} V) at or above threshold");
            }
            AppEvent::DashboardConnected => {
                info!("DASH | connected, current state pushed");
            }
            AppEvent::StatusReport(r) => {
                info!("==================================================");
                info!("SYSTEM STATUS");
                info!("==================================================");
                info!("Temperature:   {} C", r.temperature_c);
                info!("Humidity:      {} %", r.humidity_pct);
                info!("Gas level:     {}", r.gas_raw);
                info!(
                    "Flame:         {}",
                    if r.flame_active { "DETECTED" } else { "normal" }
                );
                info!(
                    "Motion:        {}",
                    if r.motion_active { "DETECTED" } else { "none" }
                );
                info!(
                    "LEDs:          status={} motion={} flame={}",
                    on_off(r.status_led),
                    on_off(r.motion_led),
                    on_off(r.flame_led),
                );
                info!("==================================================");
            }
        }
    }
}

fn on_off(lit: bool) -> &'static str {
    if lit { "ON" } else { "OFF" }
}
