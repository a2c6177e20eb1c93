//! Data bridge — connects [`InventoryStore`] watch channels to TUI actions.
//!
//! Runs as a background task: performs the initial fetch, then forwards
//! every snapshot change as an [`Action`] through the app's action channel.
//! Shuts down cleanly on cancellation.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use lanscope_core::InventoryStore;

use crate::action::{Action, Notification};

/// Spawn the data bridge for the given store.
pub async fn run_data_bridge(
    store: InventoryStore,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut devices = store.subscribe_devices();
    let mut stats = store.subscribe_stats();
    let mut scanning = store.subscribe_scanning();

    // Initial fetch. Each failure is independent and non-fatal — the
    // operator can refresh or scan to retry.
    if let Err(e) = store.load_devices().await {
        warn!(error = %e, "initial device fetch failed");
        let _ = action_tx.send(Action::Notify(Notification::error(format!(
            "device fetch failed: {e}"
        ))));
    }
    if let Err(e) = store.load_stats().await {
        warn!(error = %e, "initial stats fetch failed");
        let _ = action_tx.send(Action::Notify(Notification::error(format!(
            "stats fetch failed: {e}"
        ))));
    }

    // Push current snapshots so the screen has data immediately.
    let _ = action_tx.send(Action::DevicesUpdated(devices.borrow_and_update().clone()));
    let _ = action_tx.send(Action::StatsUpdated(*stats.borrow_and_update()));

    // Stream loop — forward every change until cancelled.
    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            Ok(()) = devices.changed() => {
                let _ = action_tx.send(Action::DevicesUpdated(devices.borrow_and_update().clone()));
            }
            Ok(()) = stats.changed() => {
                let _ = action_tx.send(Action::StatsUpdated(*stats.borrow_and_update()));
            }
            Ok(()) = scanning.changed() => {
                let _ = action_tx.send(Action::ScanningChanged(*scanning.borrow_and_update()));
            }
        }
    }
}
