// ── Wire types for the backend contract ──
//
// The backend serializes entities in camelCase JSON. These shapes are the
// compatibility surface; changing a field name here is a protocol change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reachability as last determined by the backend scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceStatus {
    Online,
    Offline,
    /// Present in the backend entity for devices it has not probed yet.
    Unknown,
}

impl DeviceStatus {
    pub fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

/// One observed network endpoint.
///
/// `mac_address` is the durable identity key the backend reconciles on;
/// `ip_address` can change under DHCP. `id` is the backend's database
/// identity, stable across scans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: i64,
    pub ip_address: String,
    pub mac_address: String,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    /// Backend's coarse classification ("Router", "Mobile Device", …).
    #[serde(default)]
    pub device_type: Option<String>,
    pub status: DeviceStatus,
    pub is_authorized: bool,
    pub first_seen: DateTime<Utc>,
    /// `None` means never observed online since discovery.
    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
}

impl Device {
    /// Hostname for display. Absence renders as "Unknown" — display only,
    /// the search filter never matches on this placeholder.
    pub fn display_hostname(&self) -> &str {
        self.hostname.as_deref().unwrap_or("Unknown")
    }

    /// Vendor for display, same placeholder convention as the hostname.
    pub fn display_vendor(&self) -> &str {
        self.vendor.as_deref().unwrap_or("Unknown")
    }
}

/// Aggregate counters computed server-side.
///
/// Authoritative from the backend; the client never derives these from the
/// device list, so they may transiently disagree with it between an action
/// and the next stats fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_devices: u64,
    pub online_devices: u64,
    pub unauthorized_devices: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn device_deserializes_camel_case() {
        let d: Device = serde_json::from_value(json!({
            "id": 7,
            "ipAddress": "192.168.1.23",
            "macAddress": "aa:bb:cc:dd:ee:ff",
            "hostname": "printer",
            "vendor": "HP",
            "deviceType": "Printer",
            "status": "ONLINE",
            "isAuthorized": false,
            "firstSeen": "2024-06-15T10:30:00Z",
            "lastSeen": "2024-06-15T11:00:00Z"
        }))
        .unwrap();

        assert_eq!(d.id, 7);
        assert_eq!(d.mac_address, "aa:bb:cc:dd:ee:ff");
        assert_eq!(d.status, DeviceStatus::Online);
        assert!(!d.is_authorized);
        assert_eq!(d.hostname.as_deref(), Some("printer"));
    }

    #[test]
    fn device_tolerates_absent_optional_fields() {
        let d: Device = serde_json::from_value(json!({
            "id": 1,
            "ipAddress": "192.168.1.50",
            "macAddress": "11:22:33:44:55:66",
            "status": "OFFLINE",
            "isAuthorized": true,
            "firstSeen": "2024-06-15T10:30:00Z"
        }))
        .unwrap();

        assert!(d.hostname.is_none());
        assert!(d.vendor.is_none());
        assert!(d.last_seen.is_none());
        assert_eq!(d.display_hostname(), "Unknown");
        assert_eq!(d.display_vendor(), "Unknown");
    }

    #[test]
    fn stats_deserializes_camel_case() {
        let s: Stats = serde_json::from_value(json!({
            "totalDevices": 12,
            "onlineDevices": 8,
            "unauthorizedDevices": 3
        }))
        .unwrap();

        assert_eq!(s.total_devices, 12);
        assert_eq!(s.online_devices, 8);
        assert_eq!(s.unauthorized_devices, 3);
    }
}
