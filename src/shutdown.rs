//! Fail-safe shutdown.
//!
//! The single hard safety invariant of the system: no code path may exit
//! the process while an actuator remains engaged due to a software fault.
//! Both exit paths — a termination request and an unrecovered fault
//! escaping the control loop — funnel through [`fail_safe_shutdown`]
//! before the process ends.
//!
//! The termination request itself is a lock-free flag so it can be raised
//! from a signal handler or ISR context without touching the loop's state.

use core::sync::atomic::{AtomicBool, Ordering};

use log::{error, info};

use crate::app::ports::{Actuator, ActuatorPort};

static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Request loop termination. Lock-free; callable from ISR or signal
/// context. The control loop honours the request at the top of its next
/// tick.
pub fn request_shutdown() {
    SHUTDOWN_REQUESTED.store(true, Ordering::Release);
}

/// True once a termination request has been raised.
pub fn shutdown_requested() -> bool {
    SHUTDOWN_REQUESTED.load(Ordering::Acquire)
}

/// Reset the request flag (tests only — the flag is otherwise latched
/// for the life of the process).
#[cfg(not(target_os = "espidf"))]
pub fn reset_shutdown_request() {
    SHUTDOWN_REQUESTED.store(false, Ordering::Release);
}

/// Drive every actuator to its off state, best-effort: a failed write is
/// logged and the remaining actuators are still attempted.
pub fn fail_safe_shutdown(hw: &mut impl ActuatorPort) {
    info!("Fail-safe: driving all actuators off");
    for actuator in Actuator::ALL {
        if let Err(e) = hw.set(actuator, false) {
            error!("Fail-safe: {actuator} off failed: {e}");
        }
    }
    info!("Fail-safe: complete");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ActuatorFault;

    /// Mock that rejects writes to one actuator and records the rest.
    struct PartiallyBrokenHw {
        broken: Actuator,
        offs: Vec<Actuator>,
    }

    impl ActuatorPort for PartiallyBrokenHw {
        fn set(&mut self, actuator: Actuator, on: bool) -> Result<(), ActuatorFault> {
            if actuator == self.broken {
                return Err(ActuatorFault::GpioWriteFailed);
            }
            if !on {
                self.offs.push(actuator);
            }
            Ok(())
        }
    }

    #[test]
    fn every_actuator_is_attempted_despite_a_failure() {
        for broken in Actuator::ALL {
            let mut hw = PartiallyBrokenHw {
                broken,
                offs: Vec::new(),
            };
            fail_safe_shutdown(&mut hw);

            let expected: Vec<Actuator> =
                Actuator::ALL.into_iter().filter(|a| *a != broken).collect();
            assert_eq!(hw.offs, expected, "broken={broken:?}");
        }
    }

    #[test]
    fn shutdown_request_is_latched_until_reset() {
        reset_shutdown_request();
        assert!(!shutdown_requested());
        request_shutdown();
        assert!(shutdown_requested());
        assert!(shutdown_requested());
        reset_shutdown_request();
        assert!(!shutdown_requested());
    }
}
