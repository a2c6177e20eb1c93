//! All possible UI actions. Actions are the sole mechanism for state mutation.

use std::sync::Arc;

use lanscope_core::{Device, Stats};

/// Severity of a notification toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// A transient toast shown in the status line.
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Info,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
        }
    }
}

/// Everything that can happen in the UI.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Loop plumbing ───────────────────────────────────────────────
    Tick,
    Render,
    Resize(u16, u16),
    Quit,

    // ── Store snapshots (pushed by the data bridge) ─────────────────
    DevicesUpdated(Arc<Vec<Arc<Device>>>),
    StatsUpdated(Stats),
    ScanningChanged(bool),

    // ── User intents ────────────────────────────────────────────────
    /// Re-fetch devices and stats (initial load and manual refresh).
    Refresh,
    /// Trigger a backend scan.
    Scan,
    /// Authorize the device with the given backend id.
    Authorize(i64),

    // ── Feedback ────────────────────────────────────────────────────
    Notify(Notification),
}
