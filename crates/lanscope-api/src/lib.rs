//! Async client for the lanscope network discovery backend.
//!
//! The backend owns the actual scanning (ARP table, ping sweep, OUI vendor
//! lookup) and authorization persistence; this crate only speaks its small
//! JSON REST surface under `/api/devices`:
//!
//! - `GET  /api/devices` — full device inventory
//! - `GET  /api/devices/stats` — aggregate counters
//! - `GET  /api/devices/unauthorized` — server-side unauthorized subset
//! - `POST /api/devices/scan` — trigger a scan, returns the fresh inventory
//! - `PUT  /api/devices/{id}/authorize` — mark a device authorized
//!
//! The wire schema in [`types`] is the compatibility surface; consumers
//! (`lanscope-core`) use these types directly as the domain model.

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::DevicesClient;
pub use error::Error;
pub use transport::TransportConfig;
pub use types::{Device, DeviceStatus, Stats};
