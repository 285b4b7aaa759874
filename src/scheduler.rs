//! Multi-rate scheduler engine.
//!
//! The control loop runs three activities on independent periods from a
//! single cooperative thread. The scheduler tracks a per-activity
//! last-run timestamp and notifies a [`SchedulerDelegate`] when an
//! activity's period has elapsed; the main loop implements the delegate
//! to dispatch the actual evaluation/upload steps.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Control Loop Tick                      │
//! │                                                              │
//! │  dashboard poll ──▶ scheduler.tick(now) ──▶ alarm.tick(now)  │
//! │                          │                                   │
//! │        ┌─────────────────┼──────────────────┐                │
//! │        ▼                 ▼                  ▼                │
//! │  SensorEvaluation  MotionEvaluation  TelemetryUpload         │
//! │     (2 s)              (1 s)             (15 s)              │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Backlog behaviour
//!
//! "Due" is an elapsed wall-clock delta against a monotonic clock, not a
//! fixed-phase schedule: firing records `now` as the new baseline. If the
//! loop stalls, each activity fires at most once on resumption — there is
//! no catch-up burst of queued executions.

use crate::config::SystemConfig;

// ═══════════════════════════════════════════════════════════════
//  Activities
// ═══════════════════════════════════════════════════════════════

/// The independently-paced activities of the control loop, in dispatch
/// order. Motion is the most latency-sensitive; comfort sensors and gas
/// share a moderate cadence; remote reporting is rate-limited to respect
/// third-party API quotas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activity {
    /// Full evaluation: climate, flame, gas + dashboard push.
    SensorEvaluation,
    /// Motion-only evaluation.
    MotionEvaluation,
    /// Telemetry upload + full status report.
    TelemetryUpload,
}

/// Callback trait the scheduler invokes when an activity is due.
///
/// Decouples the scheduler from the evaluation steps: the scheduler knows
/// nothing about sensors, actuators, or the network, which keeps it
/// independently testable.
pub trait SchedulerDelegate {
    fn on_activity_due(&mut self, activity: Activity);
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// Per-activity bookkeeping.
#[derive(Debug, Clone, Copy)]
struct Slot {
    period_ms: u64,
    /// Timestamp of the last fire. `None` = never fired, due immediately.
    last_run_ms: Option<u64>,
}

impl Slot {
    fn new(period_ms: u32) -> Self {
        Self {
            period_ms: u64::from(period_ms),
            last_run_ms: None,
        }
    }

    fn due(&self, now_ms: u64) -> bool {
        match self.last_run_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) >= self.period_ms,
        }
    }
}

/// The multi-rate scheduler.
pub struct MultiRateScheduler {
    sensor: Slot,
    motion: Slot,
    telemetry: Slot,
}

impl MultiRateScheduler {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            sensor: Slot::new(config.sensor_period_ms),
            motion: Slot::new(config.motion_period_ms),
            telemetry: Slot::new(config.telemetry_period_ms),
        }
    }

    /// Evaluate all activities against `now_ms`. Call once per control
    /// loop tick; fires `delegate.on_activity_due()` for each due
    /// activity, in dispatch order, and records `now_ms` as its new
    /// baseline.
    ///
    /// The baseline is the tick's timestamp, captured before the activity
    /// runs — a slow evaluation or a failed upload does not push the next
    /// occurrence later than its period.
    pub fn tick(&mut self, now_ms: u64, delegate: &mut dyn SchedulerDelegate) {
        if self.sensor.due(now_ms) {
            self.sensor.last_run_ms = Some(now_ms);
            delegate.on_activity_due(Activity::SensorEvaluation);
        }
        if self.motion.due(now_ms) {
            self.motion.last_run_ms = Some(now_ms);
            delegate.on_activity_due(Activity::MotionEvaluation);
        }
        if self.telemetry.due(now_ms) {
            self.telemetry.last_run_ms = Some(now_ms);
            delegate.on_activity_due(Activity::TelemetryUpload);
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    /// Test delegate that records due notifications.
    struct RecordingDelegate {
        fires: Vec<(Activity, u64)>,
        now_ms: u64,
    }

    impl RecordingDelegate {
        fn new() -> Self {
            Self {
                fires: Vec::new(),
                now_ms: 0,
            }
        }

        fn of(&self, activity: Activity) -> Vec<u64> {
            self.fires
                .iter()
                .filter(|(a, _)| *a == activity)
                .map(|(_, t)| *t)
                .collect()
        }
    }

    impl SchedulerDelegate for RecordingDelegate {
        fn on_activity_due(&mut self, activity: Activity) {
            self.fires.push((activity, self.now_ms));
        }
    }

    fn tick_at(sched: &mut MultiRateScheduler, delegate: &mut RecordingDelegate, now_ms: u64) {
        delegate.now_ms = now_ms;
        sched.tick(now_ms, delegate);
    }

    #[test]
    fn first_tick_fires_every_activity() {
        let mut sched = MultiRateScheduler::new(&SystemConfig::default());
        let mut delegate = RecordingDelegate::new();

        tick_at(&mut sched, &mut delegate, 0);

        assert_eq!(
            delegate.fires.iter().map(|(a, _)| *a).collect::<Vec<_>>(),
            vec![
                Activity::SensorEvaluation,
                Activity::MotionEvaluation,
                Activity::TelemetryUpload,
            ]
        );
    }

    #[test]
    fn motion_respects_one_second_period() {
        let mut sched = MultiRateScheduler::new(&SystemConfig::default());
        let mut delegate = RecordingDelegate::new();

        // Baseline everything at t=0.
        tick_at(&mut sched, &mut delegate, 0);
        delegate.fires.clear();

        tick_at(&mut sched, &mut delegate, 500); // 0.5 s elapsed — too early
        tick_at(&mut sched, &mut delegate, 1_000); // period elapsed — fires
        tick_at(&mut sched, &mut delegate, 1_500); // 0.5 s since fire — too early
        tick_at(&mut sched, &mut delegate, 2_000); // fires again

        assert_eq!(delegate.of(Activity::MotionEvaluation), vec![1_000, 2_000]);
    }

    #[test]
    fn activities_fire_on_independent_cadences() {
        let mut sched = MultiRateScheduler::new(&SystemConfig::default());
        let mut delegate = RecordingDelegate::new();

        for t in (0..=16_000).step_by(100) {
            tick_at(&mut sched, &mut delegate, t);
        }

        // 0, 2, 4, ... 16 s → 9 sensor evaluations.
        assert_eq!(delegate.of(Activity::SensorEvaluation).len(), 9);
        // 0, 1, 2, ... 16 s → 17 motion evaluations.
        assert_eq!(delegate.of(Activity::MotionEvaluation).len(), 17);
        // 0 and 15 s → 2 uploads.
        assert_eq!(delegate.of(Activity::TelemetryUpload), vec![0, 15_000]);
    }

    #[test]
    fn stalled_loop_fires_once_per_activity_on_resume() {
        let mut sched = MultiRateScheduler::new(&SystemConfig::default());
        let mut delegate = RecordingDelegate::new();

        tick_at(&mut sched, &mut delegate, 0);
        delegate.fires.clear();

        // The loop blocks for a full minute — four telemetry periods and
        // thirty sensor periods are "missed".
        tick_at(&mut sched, &mut delegate, 60_000);

        assert_eq!(delegate.of(Activity::SensorEvaluation).len(), 1);
        assert_eq!(delegate.of(Activity::MotionEvaluation).len(), 1);
        assert_eq!(delegate.of(Activity::TelemetryUpload).len(), 1);

        // And the baselines moved to the resume time, not the old phase.
        delegate.fires.clear();
        tick_at(&mut sched, &mut delegate, 60_900);
        assert!(delegate.fires.is_empty());
    }

    #[test]
    fn dispatch_order_is_sensor_motion_telemetry() {
        let mut sched = MultiRateScheduler::new(&SystemConfig::default());
        let mut delegate = RecordingDelegate::new();

        tick_at(&mut sched, &mut delegate, 0);
        tick_at(&mut sched, &mut delegate, 30_000);

        for pair in delegate.fires.chunks(3) {
            assert_eq!(pair[0].0, Activity::SensorEvaluation);
            assert_eq!(pair[1].0, Activity::MotionEvaluation);
            assert_eq!(pair[2].0, Activity::TelemetryUpload);
        }
    }
}
