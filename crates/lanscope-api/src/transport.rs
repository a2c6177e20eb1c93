// Shared transport configuration for building reqwest::Client instances.
//
// Keeps timeout and user-agent settings in one place so every consumer
// (TUI, tests) builds the same kind of client.

use std::time::Duration;

/// Transport configuration for the backend HTTP client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Overall per-request timeout.
    pub timeout: Duration,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Per-request override for the scan endpoint. A full ARP walk plus
    /// ping sweep can run for minutes on a /24.
    pub scan_timeout: Duration,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            scan_timeout: Duration::from_secs(300),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::Error> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .user_agent(concat!("lanscope/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(client)
    }
}
