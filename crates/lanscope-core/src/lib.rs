//! Reactive data layer between `lanscope-api` and the TUI.
//!
//! This crate owns the client-side inventory logic for the dashboard:
//!
//! - **[`InventoryStore`]** — the authoritative local copy of the device
//!   list and the aggregate stats snapshot. Every read/write against the
//!   backend goes through it; each operation replaces whole snapshots and
//!   leaves held state untouched on failure. Subscribers observe changes
//!   through `tokio::sync::watch` receivers.
//!
//! - **[`filter`]** — the pure view-filter derivation:
//!   `(devices, search term, mode) -> filtered subset`, order-preserving
//!   and recomputed wholesale whenever any input changes.
//!
//! The domain types ([`Device`], [`Stats`], …) are re-exported from
//! `lanscope-api`: the wire schema is the compatibility surface and the
//! client adds no fields of its own on top of it.

pub mod error;
pub mod filter;
pub mod store;

pub use error::CoreError;
pub use filter::{FilterMode, filter_devices};
pub use store::{InventoryStore, StoreConfig};

// Re-export the domain model at the crate root for ergonomics.
pub use lanscope_api::{Device, DeviceStatus, Stats};
