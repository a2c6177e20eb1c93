// Hand-crafted async HTTP client for the lanscope backend.
//
// Base path: /api/devices
// No auth — the backend is an intranet collaborator.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::transport::TransportConfig;
use crate::types::{Device, Stats};

// ── Error response shape from the backend ────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the backend device inventory API.
///
/// Communicates via JSON REST endpoints under `/api/devices`. All methods
/// take `&self`; the client is cheap to clone and share.
#[derive(Clone)]
pub struct DevicesClient {
    http: reqwest::Client,
    base_url: Url,
    scan_timeout: Duration,
}

impl DevicesClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from a base URL and transport config.
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            scan_timeout: transport.scan_timeout,
        })
    }

    /// Wrap an existing `reqwest::Client` (used by tests).
    pub fn with_client(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        Ok(Self {
            http,
            base_url: Self::normalize_base_url(base_url)?,
            scan_timeout: TransportConfig::default().scan_timeout,
        })
    }

    /// Build the base URL ending in `/api/devices/` so joins work uniformly.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with("/api/devices") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/devices/"));
        }

        Ok(url)
    }

    /// Join a relative path (e.g. `"stats"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    /// The collection itself, without the trailing slash the joins need.
    fn collection_url(&self) -> Url {
        let mut url = self.base_url.clone();
        let path = self.base_url.path().trim_end_matches('/').to_owned();
        url.set_path(&path);
        url
    }

    // ── HTTP plumbing ────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        timeout: Option<Duration>,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let mut req = self.http.post(url);
        if let Some(t) = timeout {
            req = req.timeout(t);
        }
        let resp = req.send().await?;
        Self::handle_response(resp).await
    }

    async fn put_no_response(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).send().await?;
        Self::handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview: String = body.chars().take(200).collect();
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            // The backend may echo the updated entity; success is signalled
            // by status alone, so any body is ignored.
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();

        let message = serde_json::from_str::<ErrorResponse>(&raw)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                }
            });

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// `GET /api/devices` — the full known inventory.
    pub async fn list_devices(&self) -> Result<Vec<Device>, Error> {
        let url = self.collection_url();
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        Self::handle_response(resp).await
    }

    /// `GET /api/devices/unauthorized` — server-side unauthorized subset.
    ///
    /// The dashboard filters locally; this exists for consumers that want
    /// the backend's own view without pulling the whole inventory.
    pub async fn list_unauthorized(&self) -> Result<Vec<Device>, Error> {
        self.get("unauthorized").await
    }

    /// `GET /api/devices/stats` — aggregate counters.
    pub async fn get_stats(&self) -> Result<Stats, Error> {
        self.get("stats").await
    }

    /// `POST /api/devices/scan` — trigger a fresh scan.
    ///
    /// Potentially slow; uses the transport's dedicated scan timeout.
    /// Returns the full replacement inventory.
    pub async fn scan_network(&self) -> Result<Vec<Device>, Error> {
        self.post("scan", Some(self.scan_timeout)).await
    }

    /// `PUT /api/devices/{id}/authorize` — mark a device authorized.
    ///
    /// Success is indicated by the response status only.
    pub async fn authorize_device(&self, device_id: i64) -> Result<(), Error> {
        self.put_no_response(&format!("{device_id}/authorize")).await
    }
}

impl std::fmt::Debug for DevicesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DevicesClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}
