//! Telemetry uplink adapter.
//!
//! Implements [`TelemetryPort`] as a single HTTP POST per cycle: the
//! report is serialised to the backend's five-field JSON body and written
//! to the fixed update endpoint, keyed by the static write key. Any
//! transport or encoding failure is reported to the caller, which logs it
//! and waits for the next scheduled cycle — there is no immediate retry
//! and no backoff.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: ESP-IDF HTTP client through the
//!   `embedded-svc` client traits.
//! - **all other targets**: in-memory simulation; tests observe the
//!   serialised payloads and inject failures.

use log::info;

use crate::app::events::TelemetryReport;
use crate::app::ports::TelemetryPort;
use crate::error::NetworkFault;

pub struct TelemetryUplink {
    base_url: heapless::String<64>,
    write_key: heapless::String<32>,
    #[cfg(not(target_os = "espidf"))]
    sim_uploads: Vec<String>,
    #[cfg(not(target_os = "espidf"))]
    sim_failures: u32,
}

impl TelemetryUplink {
    pub fn new(base_url: &str, write_key: &str) -> Self {
        let mut url = heapless::String::new();
        let _ = url.push_str(base_url);
        let mut key = heapless::String::new();
        let _ = key.push_str(write_key);
        Self {
            base_url: url,
            write_key: key,
            #[cfg(not(target_os = "espidf"))]
            sim_uploads: Vec::new(),
            #[cfg(not(target_os = "espidf"))]
            sim_failures: 0,
        }
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_upload(&mut self, body: &[u8]) -> Result<(), NetworkFault> {
        use embedded_svc::http::client::Client as HttpClient;
        use embedded_svc::http::Status;
        use embedded_svc::io::Write;
        use esp_idf_svc::http::client::{
            Configuration as HttpClientConfiguration, EspHttpConnection,
        };

        let connection = EspHttpConnection::new(&HttpClientConfiguration::default())
            .map_err(|_| NetworkFault::UploadFailed)?;
        let mut client = HttpClient::wrap(connection);

        let url = format!("{}?api_key={}", self.base_url, self.write_key);
        let headers = [("Content-Type", "application/json")];

        let mut request = client
            .post(&url, &headers)
            .map_err(|_| NetworkFault::UploadFailed)?;
        request
            .write_all(body)
            .map_err(|_| NetworkFault::UploadFailed)?;
        let response = request.submit().map_err(|_| NetworkFault::UploadFailed)?;

        let status = response.status();
        if !(200..300).contains(&status) {
            return Err(NetworkFault::HttpStatus(status));
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_upload(&mut self, body: &[u8]) -> Result<(), NetworkFault> {
        if self.sim_failures > 0 {
            self.sim_failures -= 1;
            return Err(NetworkFault::UploadFailed);
        }
        let _ = &self.write_key;
        self.sim_uploads
            .push(String::from_utf8_lossy(body).into_owned());
        Ok(())
    }

    // ── Host-simulation hooks ─────────────────────────────────

    /// Serialised JSON bodies accepted since construction.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_uploads(&self) -> &[String] {
        &self.sim_uploads
    }

    /// Make the next `n` uploads fail at the transport layer.
    #[cfg(not(target_os = "espidf"))]
    pub fn sim_fail_next_uploads(&mut self, n: u32) {
        self.sim_failures = n;
    }
}

// ───────────────────────────────────────────────────────────────
// TelemetryPort
// ───────────────────────────────────────────────────────────────

impl TelemetryPort for TelemetryUplink {
    fn upload(&mut self, report: &TelemetryReport) -> Result<(), NetworkFault> {
        let body = serde_json::to_vec(report).map_err(|_| NetworkFault::EncodeFailed)?;
        self.platform_upload(&body)?;
        info!(
            "Telemetry: report accepted by {} ({} bytes)",
            self.base_url,
            body.len()
        );
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> TelemetryReport {
        TelemetryReport {
            temperature_c: 21,
            humidity_pct: 48,
            gas_raw: 900,
            flame: 0,
            motion: 1,
        }
    }

    #[test]
    fn upload_sends_backend_field_layout() {
        let mut uplink = TelemetryUplink::new("http://example.invalid/update", "KEY");
        uplink.upload(&report()).unwrap();

        let bodies = uplink.sim_uploads();
        assert_eq!(bodies.len(), 1);
        let v: serde_json::Value = serde_json::from_str(&bodies[0]).unwrap();
        assert_eq!(v["field1"], 21);
        assert_eq!(v["field2"], 48);
        assert_eq!(v["field3"], 900);
        assert_eq!(v["field4"], 0);
        assert_eq!(v["field5"], 1);
    }

    #[test]
    fn transport_failure_surfaces_and_clears() {
        let mut uplink = TelemetryUplink::new("http://example.invalid/update", "KEY");
        uplink.sim_fail_next_uploads(1);
        assert_eq!(uplink.upload(&report()), Err(NetworkFault::UploadFailed));
        assert!(uplink.upload(&report()).is_ok());
        assert_eq!(uplink.sim_uploads().len(), 1);
    }
}
