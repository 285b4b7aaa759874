//! HomeSentry Firmware — Main Entry Point
//!
//! Hexagonal architecture around a cooperative multi-rate control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter    LogEventSink    DashboardBridge            │
//! │  (Sensor+Actuator)  (EventSink)     (DashboardPort)            │
//! │  WifiAdapter        TelemetryUplink MonotonicClock             │
//! │  (Connectivity)     (TelemetryPort) (time source)              │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  System State · Gas Alarm                              │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  MultiRateScheduler (delegate-driven) · Fail-Safe Shutdown     │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info, warn};

use homesentry::adapters::dashboard::DashboardBridge;
use homesentry::adapters::hardware::HardwareAdapter;
use homesentry::adapters::log_sink::LogEventSink;
use homesentry::adapters::telemetry::TelemetryUplink;
use homesentry::adapters::time::MonotonicClock;
use homesentry::adapters::wifi::{ConnectivityPort, WifiAdapter};
use homesentry::app::service::AppService;
use homesentry::config::SystemConfig;
use homesentry::drivers::buzzer::BuzzerDriver;
use homesentry::drivers::hw_init;
use homesentry::drivers::led::LedDriver;
use homesentry::pins;
use homesentry::scheduler::{Activity, MultiRateScheduler, SchedulerDelegate};
use homesentry::sensors::climate::ClimateSensor;
use homesentry::sensors::flame::FlameSensor;
use homesentry::sensors::gas::GasSensor;
use homesentry::sensors::motion::MotionSensor;
use homesentry::sensors::SensorHub;
use homesentry::shutdown;

// ── Scheduler delegate ────────────────────────────────────────
//
// Collects the tick's due activities so the loop body can dispatch them
// after the scheduler borrow ends. The scheduler itself knows nothing
// about sensors, the dashboard, or telemetry.

#[derive(Default)]
struct DueList(heapless::Vec<Activity, 3>);

impl SchedulerDelegate for DueList {
    fn on_activity_due(&mut self, activity: Activity) {
        let _ = self.0.push(activity);
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Platform bootstrap ─────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }

    info!("╔══════════════════════════════════════╗");
    info!("║  HomeSentry v{}                     ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Peripherals ────────────────────────────────────────
    // No actuator has been energised yet, so an init failure can abort
    // without a fail-safe pass.
    if let Err(e) = hw_init::init_peripherals() {
        error!("HAL init failed: {e}");
        anyhow::bail!("peripheral init failed: {e}");
    }

    let config = SystemConfig::default();

    // ── 3. Network association (bounded startup phase) ────────
    let mut wifi = WifiAdapter::new();
    wifi.set_credentials(&config.wifi_ssid, &config.wifi_password)
        .map_err(|e| anyhow::anyhow!("WiFi credentials rejected: {e}"))?;
    if let Err(e) = wifi.connect_with_timeout(config.wifi_connect_timeout_secs) {
        // Local sensing and alarms do not depend on the network; run
        // degraded and let the reconnect poll keep trying.
        warn!("WiFi association failed ({e}); starting without connectivity");
    }

    // ── 4. Construct adapters ─────────────────────────────────
    let sensor_hub = SensorHub::new(
        ClimateSensor::new(pins::CLIMATE_DATA_GPIO),
        FlameSensor::new(pins::FLAME_SENSE_GPIO),
        MotionSensor::new(pins::MOTION_SENSE_GPIO),
        GasSensor::new(pins::GAS_ADC_CHANNEL),
    );
    let mut hw = HardwareAdapter::new(
        sensor_hub,
        LedDriver::new(pins::STATUS_LED_GPIO),
        LedDriver::new(pins::MOTION_LED_GPIO),
        LedDriver::new(pins::FLAME_LED_GPIO),
        BuzzerDriver::new(pins::BUZZER_GPIO),
    );
    let mut sink = LogEventSink::new();
    let mut dash = DashboardBridge::new(&config.dashboard_token);
    let mut uplink = TelemetryUplink::new(&config.telemetry_url, &config.telemetry_write_key);
    let clock = MonotonicClock::new();

    // ── 5. App service + startup self-test ────────────────────
    let mut app = AppService::new(config.clone());
    app.start(&mut sink);
    app.self_test(&mut hw, &mut sink, clock.now_ms());

    let mut scheduler = MultiRateScheduler::new(&config);

    info!("System ready. Entering control loop.");

    // ── 6. Control loop ───────────────────────────────────────
    let result = run_loop(
        &config,
        &clock,
        &mut scheduler,
        &mut app,
        &mut hw,
        &mut dash,
        &mut uplink,
        &mut wifi,
        &mut sink,
    );

    // Every exit path converges here: a requested termination returns
    // Ok, an unrecovered fault returns Err — actuators go dark first
    // either way.
    shutdown::fail_safe_shutdown(&mut hw);
    match &result {
        Ok(()) => info!("HomeSentry stopped safely."),
        Err(e) => error!("HomeSentry stopped after unrecovered fault: {e}"),
    }
    result
}

// ── Control loop ──────────────────────────────────────────────

/// One tick per iteration: service the dashboard's inbound path, run the
/// due activities, advance the alarm, poll connectivity, yield.
#[allow(clippy::too_many_arguments)]
fn run_loop(
    config: &SystemConfig,
    clock: &MonotonicClock,
    scheduler: &mut MultiRateScheduler,
    app: &mut AppService,
    hw: &mut HardwareAdapter,
    dash: &mut DashboardBridge,
    uplink: &mut TelemetryUplink,
    wifi: &mut WifiAdapter,
    sink: &mut LogEventSink,
) -> Result<()> {
    loop {
        if shutdown::shutdown_requested() {
            info!("Termination requested — leaving control loop");
            return Ok(());
        }

        let now_ms = clock.now_ms();

        // Bring the dashboard session up once connectivity is available;
        // the connected event then triggers the one-time full push.
        if wifi.is_connected() && !dash.is_connected() {
            if let Err(e) = dash.connect() {
                warn!("Dashboard: connect failed ({e})");
            }
        }

        // 1. Inbound dashboard commands, before any scheduled activity.
        dash.service();
        app.service_commands(dash, hw);
        if dash.take_connected_event() {
            app.on_dashboard_connected(dash, sink);
        }

        // 2–4. Multi-rate activities due this tick.
        let mut due = DueList::default();
        scheduler.tick(now_ms, &mut due);
        for &activity in due.0.iter() {
            match activity {
                Activity::SensorEvaluation => app.evaluate_sensors(hw, dash, sink, now_ms),
                Activity::MotionEvaluation => app.evaluate_motion(hw, sink),
                Activity::TelemetryUpload => app.upload_telemetry(uplink, sink),
            }
        }

        // Buzzer pulse windows are tick-driven — the loop never blocks
        // on the alarm.
        app.tick_alarm(clock.now_ms(), hw);

        // WiFi reconnection poll (exponential backoff).
        wifi.poll();

        // 5. Yield until the next tick.
        std::thread::sleep(std::time::Duration::from_millis(u64::from(
            config.tick_delay_ms,
        )));
    }
}
