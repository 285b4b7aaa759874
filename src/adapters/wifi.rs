//! WiFi station-mode adapter.
//!
//! Implements [`ConnectivityPort`] — the boundary for network
//! connectivity. Association is a bounded startup phase: the caller gets
//! an explicit failure result when the access point does not answer within
//! the configured timeout, keeping the fail-safe contract meaningful even
//! when network setup never completes.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls.
//! - **all other targets**: simulation stubs for host-side tests.
//!
//! ## Reconnection policy
//!
//! On disconnect the adapter waits an exponential backoff (2 s → 4 s →
//! 8 s … capped at 60 s) before retrying from the per-tick poll.

use core::fmt;
use log::{error, info, warn};

// ───────────────────────────────────────────────────────────────
// Port trait
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
    Timeout,
    AlreadyConnected,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => {
                write!(f, "password invalid (must be 8-64 bytes for WPA2, or empty for open)")
            }
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
            Self::Timeout => write!(f, "association timed out"),
            Self::AlreadyConnected => write!(f, "already connected to AP"),
        }
    }
}

pub trait ConnectivityPort {
    /// Bounded association: fail with [`ConnectivityError::Timeout`] when
    /// the link is not up within `timeout_secs`.
    fn connect_with_timeout(&mut self, timeout_secs: u32) -> Result<(), ConnectivityError>;
    fn disconnect(&mut self);
    fn is_connected(&self) -> bool;
    /// Per-tick reconnection poll (backoff-driven). Non-blocking.
    fn poll(&mut self);
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError>;
}

// ───────────────────────────────────────────────────────────────
// Connection state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting { attempt: u32 },
}

const MAX_BACKOFF_SECS: u32 = 60;

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 {
        return Err(ConnectivityError::InvalidSsid);
    }
    if !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    state: WifiState,
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    backoff_secs: u32,
    /// Simulation: counts platform_connect() calls for deterministic
    /// failure injection in tests.
    #[cfg(not(target_os = "espidf"))]
    sim_connect_counter: u32,
    #[cfg(not(target_os = "espidf"))]
    sim_fail_attempts: u32,
}

impl WifiAdapter {
    pub fn new() -> Self {
        Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            backoff_secs: 2,
            #[cfg(not(target_os = "espidf"))]
            sim_connect_counter: 0,
            #[cfg(not(target_os = "espidf"))]
            sim_fail_attempts: 0,
        }
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    /// Make the next `n` simulated association attempts fail.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_fail_next_attempts(&mut self, n: u32) {
        self.sim_fail_attempts = n;
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self, timeout_secs: u32) -> Result<(), ConnectivityError> {
        // ESP-IDF STA association with a bounded wait. The netif and
        // event-loop handles are initialised in main; association status
        // is polled rather than event-driven so the startup phase stays a
        // plain synchronous call with a deadline.
        use esp_idf_svc::sys::*;

        fn ms_to_ticks(ms: u32) -> u32 {
            (ms as u64 * configTICK_RATE_HZ as u64 / 1000) as u32
        }

        let deadline_us =
            (unsafe { esp_timer_get_time() }) as u64 + u64::from(timeout_secs) * 1_000_000;
        // SAFETY: esp_wifi_connect on an initialised STA interface;
        // called from the single main thread during startup.
        let ret = unsafe { esp_wifi_connect() };
        if ret != ESP_OK {
            return Err(ConnectivityError::ConnectionFailed);
        }
        loop {
            // SAFETY: zeroed out-param struct, filled by the driver once
            // associated; the call returns an error code until then.
            let mut ap_info: wifi_ap_record_t = unsafe { core::mem::zeroed() };
            if unsafe { esp_wifi_sta_get_ap_info(&mut ap_info) } == ESP_OK {
                return Ok(());
            }
            if (unsafe { esp_timer_get_time() }) as u64 >= deadline_us {
                // SAFETY: aborts the half-open association attempt.
                unsafe { esp_wifi_disconnect() };
                return Err(ConnectivityError::Timeout);
            }
            // SAFETY: FreeRTOS delay; yields the CPU for 100 ms.
            unsafe { vTaskDelay(ms_to_ticks(100)) };
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self, _timeout_secs: u32) -> Result<(), ConnectivityError> {
        self.sim_connect_counter = self.sim_connect_counter.wrapping_add(1);
        if self.sim_fail_attempts > 0 {
            self.sim_fail_attempts -= 1;
            warn!(
                "WiFi(sim): simulated association timeout (attempt {})",
                self.sim_connect_counter
            );
            return Err(ConnectivityError::Timeout);
        }
        info!(
            "WiFi(sim): connected to '{}' (attempt {})",
            self.ssid, self.sim_connect_counter
        );
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_disconnect(&mut self) {
        // SAFETY: tears down the STA association; safe on an idle interface.
        unsafe {
            esp_idf_svc::sys::esp_wifi_disconnect();
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_disconnect(&mut self) {
        info!("WiFi(sim): disconnected");
    }

    #[cfg(target_os = "espidf")]
    fn platform_is_connected(&self) -> bool {
        use esp_idf_svc::sys::*;
        // SAFETY: zeroed out-param struct read, no state mutation.
        let mut ap_info: wifi_ap_record_t = unsafe { core::mem::zeroed() };
        (unsafe { esp_wifi_sta_get_ap_info(&mut ap_info) }) == ESP_OK
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_connected(&self) -> bool {
        self.state == WifiState::Connected
    }
}

// ───────────────────────────────────────────────────────────────
// ConnectivityPort
// ───────────────────────────────────────────────────────────────

impl ConnectivityPort for WifiAdapter {
    fn connect_with_timeout(&mut self, timeout_secs: u32) -> Result<(), ConnectivityError> {
        if self.ssid.is_empty() {
            return Err(ConnectivityError::NoCredentials);
        }
        if self.state == WifiState::Connected {
            return Err(ConnectivityError::AlreadyConnected);
        }

        info!("WiFi: connecting to '{}' (timeout {}s)", self.ssid, timeout_secs);
        self.state = WifiState::Connecting;

        match self.platform_connect(timeout_secs) {
            Ok(()) => {
                self.state = WifiState::Connected;
                self.backoff_secs = 2;
                info!("WiFi: connected");
                Ok(())
            }
            Err(e) => {
                error!("WiFi: association failed — {}", e);
                self.state = WifiState::Reconnecting { attempt: 0 };
                Err(e)
            }
        }
    }

    fn disconnect(&mut self) {
        self.platform_disconnect();
        self.state = WifiState::Disconnected;
        info!("WiFi: disconnected");
    }

    fn is_connected(&self) -> bool {
        self.platform_is_connected()
    }

    fn poll(&mut self) {
        match self.state {
            WifiState::Reconnecting { attempt } => {
                info!(
                    "WiFi: reconnect attempt {} (backoff {}s)",
                    attempt, self.backoff_secs
                );
                match self.platform_connect(self.backoff_secs) {
                    Ok(()) => {
                        self.state = WifiState::Connected;
                        self.backoff_secs = 2;
                        info!("WiFi: reconnected");
                    }
                    Err(_) => {
                        self.backoff_secs = (self.backoff_secs * 2).min(MAX_BACKOFF_SECS);
                        self.state = WifiState::Reconnecting {
                            attempt: attempt + 1,
                        };
                    }
                }
            }
            WifiState::Connected => {
                if !self.platform_is_connected() {
                    warn!("WiFi: connection lost, entering reconnect");
                    self.state = WifiState::Reconnecting { attempt: 0 };
                }
            }
            _ => {}
        }
    }

    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        self.ssid.clear();
        self.ssid
            .push_str(ssid)
            .map_err(|_| ConnectivityError::InvalidSsid)?;
        self.password.clear();
        self.password
            .push_str(password)
            .map_err(|_| ConnectivityError::InvalidPassword)?;
        info!("WiFi: credentials updated (SSID='{}')", self.ssid);
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_ssid() {
        let mut a = WifiAdapter::new();
        assert_eq!(
            a.set_credentials("", "password123"),
            Err(ConnectivityError::InvalidSsid)
        );
    }

    #[test]
    fn rejects_short_password() {
        let mut a = WifiAdapter::new();
        assert_eq!(
            a.set_credentials("MyNet", "short"),
            Err(ConnectivityError::InvalidPassword)
        );
    }

    #[test]
    fn accepts_open_network() {
        let mut a = WifiAdapter::new();
        assert!(a.set_credentials("OpenCafe", "").is_ok());
    }

    #[test]
    fn connect_without_credentials_fails() {
        let mut a = WifiAdapter::new();
        assert_eq!(
            a.connect_with_timeout(5),
            Err(ConnectivityError::NoCredentials)
        );
    }

    #[test]
    fn connect_disconnect_roundtrip() {
        let mut a = WifiAdapter::new();
        a.set_credentials("TestNet", "password1").unwrap();
        a.connect_with_timeout(5).unwrap();
        assert!(a.is_connected());
        a.disconnect();
        assert!(!a.is_connected());
    }

    #[test]
    fn association_timeout_is_an_explicit_failure() {
        let mut a = WifiAdapter::new();
        a.set_credentials("SlowAp", "password1").unwrap();
        a.sim_fail_next_attempts(1);
        assert_eq!(a.connect_with_timeout(5), Err(ConnectivityError::Timeout));
        assert!(!a.is_connected());
        assert_eq!(a.state(), WifiState::Reconnecting { attempt: 0 });
    }

    #[test]
    fn poll_retries_with_growing_backoff() {
        let mut a = WifiAdapter::new();
        a.set_credentials("FlakyAp", "password1").unwrap();
        a.sim_fail_next_attempts(3);
        let _ = a.connect_with_timeout(5);

        a.poll(); // attempt 0 fails
        a.poll(); // attempt 1 fails
        assert!(!a.is_connected());
        a.poll(); // attempt 2 succeeds
        assert!(a.is_connected());
    }

    #[test]
    fn double_connect_fails() {
        let mut a = WifiAdapter::new();
        a.set_credentials("Net", "password1").unwrap();
        a.connect_with_timeout(5).unwrap();
        assert_eq!(
            a.connect_with_timeout(5),
            Err(ConnectivityError::AlreadyConnected)
        );
    }
}
