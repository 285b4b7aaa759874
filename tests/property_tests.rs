//! Property tests for the evaluation and scheduling invariants.

#![cfg(not(target_os = "espidf"))]

use proptest::prelude::*;

use homesentry::app::commands::DashboardCommand;
use homesentry::app::events::AppEvent;
use homesentry::app::ports::{
    Actuator, ActuatorPort, ClimateReading, DashboardPort, EventSink, SensorPort, VirtualChannel,
};
use homesentry::app::service::AppService;
use homesentry::config::SystemConfig;
use homesentry::error::{ActuatorFault, NetworkFault, SensorFault};
use homesentry::scheduler::{Activity, MultiRateScheduler, SchedulerDelegate};

// ── Minimal mocks ─────────────────────────────────────────────

struct MockHw {
    climate: Result<ClimateReading, SensorFault>,
    flame_present: bool,
    motion_present: bool,
    gas_raw: u16,
    buzzer_on: bool,
}

impl MockHw {
    fn new() -> Self {
        Self {
            climate: Ok(ClimateReading {
                temperature_c: 20,
                humidity_pct: 40,
            }),
            flame_present: false,
            motion_present: false,
            gas_raw: 0,
            buzzer_on: false,
        }
    }
}

impl SensorPort for MockHw {
    fn read_climate(&mut self) -> Result<ClimateReading, SensorFault> {
        self.climate
    }
    fn read_flame(&mut self) -> bool {
        self.flame_present
    }
    fn read_motion(&mut self) -> bool {
        self.motion_present
    }
    fn read_gas(&mut self) -> u16 {
        self.gas_raw
    }
}

impl ActuatorPort for MockHw {
    fn set(&mut self, actuator: Actuator, on: bool) -> Result<(), ActuatorFault> {
        if actuator == Actuator::Buzzer {
            self.buzzer_on = on;
        }
        Ok(())
    }
}

struct NullDash;

impl DashboardPort for NullDash {
    fn push(&mut self, _channel: VirtualChannel, _value: i32) -> Result<(), NetworkFault> {
        Ok(())
    }
    fn poll_command(&mut self) -> Option<DashboardCommand> {
        None
    }
}

struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &AppEvent) {}
}

struct CountingSink {
    gas_alarms: u32,
}

impl EventSink for CountingSink {
    fn emit(&mut self, event: &AppEvent) {
        if matches!(event, AppEvent::GasAlarm { .. }) {
            self.gas_alarms += 1;
        }
    }
}

// ── Gas threshold boundary ────────────────────────────────────

proptest! {
    #[test]
    fn gas_alarm_fires_iff_at_or_above_threshold(raw in 0u16..=u16::MAX) {
        let mut app = AppService::new(SystemConfig::default());
        let mut hw = MockHw::new();
        let mut dash = NullDash;
        let mut sink = CountingSink { gas_alarms: 0 };

        hw.gas_raw = raw;
        app.evaluate_sensors(&mut hw, &mut dash, &mut sink, 0);

        let expected = raw >= 15_000;
        prop_assert_eq!(sink.gas_alarms > 0, expected);
        prop_assert_eq!(hw.buzzer_on, expected);
    }
}

// ── Climate retention ─────────────────────────────────────────

/// A step in a simulated read history: a good reading or one of the
/// transient fault kinds.
fn climate_step() -> impl Strategy<Value = Result<ClimateReading, SensorFault>> {
    prop_oneof![
        (0i32..60, 0u32..=100).prop_map(|(t, h)| Ok(ClimateReading {
            temperature_c: t,
            humidity_pct: h,
        })),
        Just(Err(SensorFault::ChecksumMismatch)),
        Just(Err(SensorFault::Timeout)),
        Just(Err(SensorFault::BusFault)),
    ]
}

proptest! {
    #[test]
    fn climate_state_always_equals_last_successful_reading(
        steps in proptest::collection::vec(climate_step(), 1..40)
    ) {
        let mut app = AppService::new(SystemConfig::default());
        let mut hw = MockHw::new();
        let mut dash = NullDash;
        let mut sink = NullSink;

        let mut last_good: Option<ClimateReading> = None;
        for (i, step) in steps.iter().enumerate() {
            hw.climate = *step;
            app.evaluate_sensors(&mut hw, &mut dash, &mut sink, i as u64 * 2_000);
            if let Ok(r) = step {
                last_good = Some(*r);
            }

            let expected = last_good.unwrap_or(ClimateReading {
                temperature_c: 0,
                humidity_pct: 0,
            });
            prop_assert_eq!(app.state().temperature_c, expected.temperature_c);
            prop_assert_eq!(app.state().humidity_pct, expected.humidity_pct);
        }
    }
}

// ── Mirroring ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn led_mirrors_hold_after_every_evaluation(
        flames in proptest::collection::vec(any::<bool>(), 1..20),
        motions in proptest::collection::vec(any::<bool>(), 1..20),
    ) {
        let mut app = AppService::new(SystemConfig::default());
        let mut hw = MockHw::new();
        let mut dash = NullDash;
        let mut sink = NullSink;

        for (i, &flame) in flames.iter().enumerate() {
            hw.flame_present = flame;
            app.evaluate_sensors(&mut hw, &mut dash, &mut sink, i as u64 * 2_000);
            prop_assert_eq!(app.state().actuators.flame_led, flame);
            prop_assert!(app.state().mirrors_consistent());
        }
        for &motion in motions.iter() {
            hw.motion_present = motion;
            app.evaluate_motion(&mut hw, &mut sink);
            prop_assert_eq!(app.state().actuators.motion_led, motion);
            prop_assert!(app.state().mirrors_consistent());
        }
    }
}

// ── Scheduler pacing ──────────────────────────────────────────

struct TimedDelegate {
    now_ms: u64,
    fires: Vec<(Activity, u64)>,
}

impl SchedulerDelegate for TimedDelegate {
    fn on_activity_due(&mut self, activity: Activity) {
        self.fires.push((activity, self.now_ms));
    }
}

proptest! {
    /// For any monotone tick sequence, consecutive fires of one activity
    /// are never closer than its period, and a stall never causes a
    /// catch-up burst (at most one fire per activity per tick).
    #[test]
    fn activity_fires_respect_their_periods(
        gaps in proptest::collection::vec(1u64..5_000, 1..120)
    ) {
        let config = SystemConfig::default();
        let mut sched = MultiRateScheduler::new(&config);
        let mut delegate = TimedDelegate { now_ms: 0, fires: Vec::new() };

        let mut now = 0u64;
        for gap in gaps {
            delegate.now_ms = now;
            let before = delegate.fires.len();
            sched.tick(now, &mut delegate);
            let fired = &delegate.fires[before..];
            // No catch-up burst: one fire per activity at most.
            for activity in [
                Activity::SensorEvaluation,
                Activity::MotionEvaluation,
                Activity::TelemetryUpload,
            ] {
                prop_assert!(fired.iter().filter(|(a, _)| *a == activity).count() <= 1);
            }
            now += gap;
        }

        for (activity, period) in [
            (Activity::SensorEvaluation, u64::from(config.sensor_period_ms)),
            (Activity::MotionEvaluation, u64::from(config.motion_period_ms)),
            (Activity::TelemetryUpload, u64::from(config.telemetry_period_ms)),
        ] {
            let times: Vec<u64> = delegate
                .fires
                .iter()
                .filter(|(a, _)| *a == activity)
                .map(|(_, t)| *t)
                .collect();
            for pair in times.windows(2) {
                prop_assert!(
                    pair[1] - pair[0] >= period,
                    "{:?} fired {} ms apart (period {})",
                    activity,
                    pair[1] - pair[0],
                    period
                );
            }
        }
    }
}
