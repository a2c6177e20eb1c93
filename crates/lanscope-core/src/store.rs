// ── Inventory store ──
//
// The authoritative local copy of the device list and the stats snapshot.
// Every snapshot is replaced wholesale on a successful fetch; a failed
// operation leaves held state untouched. Subscribers observe changes
// through `watch` receivers.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::warn;
use url::Url;

use lanscope_api::{Device, DevicesClient, Stats, TransportConfig};

use crate::error::CoreError;

/// Configuration for connecting the store to a backend.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Backend base URL (e.g. `http://localhost:8080`).
    pub url: Url,
    pub transport: TransportConfig,
}

impl StoreConfig {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            transport: TransportConfig::default(),
        }
    }
}

/// Owns the device list and stats snapshot; mediates every read/write
/// against the backend.
///
/// Cheaply cloneable. All operations take `&self` and are independent,
/// best-effort requests: there is no de-duplication, cancellation, or
/// ordering between overlapping calls of the same kind — each applies its
/// whole-snapshot result on completion, in arrival order. An older, slow
/// fetch completing after a newer one overwrites the fresher data; see the
/// `overlapping_fetches_apply_in_arrival_order` test.
#[derive(Clone)]
pub struct InventoryStore {
    client: DevicesClient,
    devices: Arc<watch::Sender<Arc<Vec<Arc<Device>>>>>,
    stats: Arc<watch::Sender<Stats>>,
    scanning: Arc<watch::Sender<bool>>,
}

impl InventoryStore {
    /// Build a store talking to the configured backend. Performs no I/O;
    /// call [`load_devices`](Self::load_devices) /
    /// [`load_stats`](Self::load_stats) for the initial snapshots.
    pub fn connect(config: &StoreConfig) -> Result<Self, CoreError> {
        let client = DevicesClient::new(config.url.as_str(), &config.transport)
            .map_err(|e| CoreError::Config(e.to_string()))?;
        Ok(Self::with_client(client))
    }

    /// Wrap an existing client (used by tests against a mock backend).
    pub fn with_client(client: DevicesClient) -> Self {
        let (devices, _) = watch::channel(Arc::new(Vec::new()));
        let (stats, _) = watch::channel(Stats::default());
        let (scanning, _) = watch::channel(false);

        Self {
            client,
            devices: Arc::new(devices),
            stats: Arc::new(stats),
            scanning: Arc::new(scanning),
        }
    }

    // ── Snapshot accessors ───────────────────────────────────────────

    /// Current device list (cheap `Arc` clone, server order).
    pub fn devices_snapshot(&self) -> Arc<Vec<Arc<Device>>> {
        self.devices.borrow().clone()
    }

    /// Current stats snapshot.
    pub fn stats_snapshot(&self) -> Stats {
        *self.stats.borrow()
    }

    /// Whether a scan is currently in flight.
    pub fn is_scanning(&self) -> bool {
        *self.scanning.borrow()
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_devices(&self) -> watch::Receiver<Arc<Vec<Arc<Device>>>> {
        self.devices.subscribe()
    }

    pub fn subscribe_stats(&self) -> watch::Receiver<Stats> {
        self.stats.subscribe()
    }

    pub fn subscribe_scanning(&self) -> watch::Receiver<bool> {
        self.scanning.subscribe()
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Fetch the inventory and replace the local list wholesale.
    ///
    /// Stale entries disappear automatically because the replacement is
    /// full, never a merge. On failure the existing list is untouched.
    pub async fn load_devices(&self) -> Result<(), CoreError> {
        let list = self.client.list_devices().await?;
        self.replace_devices(list);
        Ok(())
    }

    /// Fetch the aggregate counters and replace the snapshot wholesale.
    ///
    /// Independent failure domain from [`load_devices`](Self::load_devices):
    /// one can fail while the other succeeds.
    pub async fn load_stats(&self) -> Result<(), CoreError> {
        let stats = self.client.get_stats().await?;
        self.stats.send_replace(stats);
        Ok(())
    }

    /// Request a fresh scan.
    ///
    /// The busy flag is raised before the request goes out and cleared on
    /// completion regardless of outcome. On success the returned inventory
    /// replaces the device list and a stats refresh is triggered; a failed
    /// stats refresh is logged but does not undo the device replacement.
    pub async fn scan_network(&self) -> Result<(), CoreError> {
        self.scanning.send_replace(true);
        let result = self.client.scan_network().await;
        self.scanning.send_replace(false);

        self.replace_devices(result?);

        if let Err(e) = self.load_stats().await {
            warn!(error = %e, "post-scan stats refresh failed");
        }
        Ok(())
    }

    /// Ask the backend to mark a device authorized.
    ///
    /// The flag is never flipped locally: only an acknowledged success
    /// triggers a re-fetch of devices and stats, so the held state always
    /// reflects what the backend actually recorded (the request can fail
    /// for reasons the client cannot evaluate, e.g. the device is gone).
    pub async fn authorize(&self, device_id: i64) -> Result<(), CoreError> {
        self.client.authorize_device(device_id).await?;

        // Both re-fetches fire concurrently; each failure is independent
        // and leaves its own snapshot as-is.
        let (devices, stats) = tokio::join!(self.load_devices(), self.load_stats());
        if let Err(e) = devices {
            warn!(error = %e, "post-authorize device reload failed");
        }
        if let Err(e) = stats {
            warn!(error = %e, "post-authorize stats reload failed");
        }
        Ok(())
    }

    fn replace_devices(&self, list: Vec<Device>) {
        let snapshot: Vec<Arc<Device>> = list.into_iter().map(Arc::new).collect();
        self.devices.send_replace(Arc::new(snapshot));
    }
}

impl std::fmt::Debug for InventoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryStore")
            .field("devices", &self.devices.borrow().len())
            .field("scanning", &*self.scanning.borrow())
            .finish_non_exhaustive()
    }
}
