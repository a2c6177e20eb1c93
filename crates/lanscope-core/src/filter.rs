// ── View filter ──
//
// Pure derivation from (devices, search term, mode) to the displayed
// subset. Order-preserving, no resort; recomputed wholesale by the view
// whenever any input changes.

use std::sync::Arc;

use lanscope_api::{Device, DeviceStatus};

/// Status filter mode for the device table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    All,
    Online,
    Offline,
    /// Matches on authorization alone; status is irrelevant.
    Unauthorized,
}

impl FilterMode {
    /// All modes in cycling order.
    pub const ALL: [FilterMode; 4] = [
        Self::All,
        Self::Online,
        Self::Offline,
        Self::Unauthorized,
    ];

    /// Next mode in cycling order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&m| m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Short label for the mode tab bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Online => "Online",
            Self::Offline => "Offline",
            Self::Unauthorized => "Unauthorized",
        }
    }

    fn matches(self, device: &Device) -> bool {
        match self {
            Self::All => true,
            Self::Online => device.status == DeviceStatus::Online,
            Self::Offline => device.status == DeviceStatus::Offline,
            Self::Unauthorized => !device.is_authorized,
        }
    }
}

/// Case-insensitive substring match over the four searchable fields.
///
/// Absent hostname/vendor never match — in particular they do NOT match
/// the text "Unknown" the display layer renders in their place.
fn matches_search(device: &Device, needle: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(needle);

    contains(&device.ip_address)
        || contains(&device.mac_address)
        || device.hostname.as_deref().is_some_and(contains)
        || device.vendor.as_deref().is_some_and(contains)
}

/// Derive the displayed subset of `devices`.
///
/// The mode predicate applies first, then (only for a non-empty term)
/// the search match; the two compose by intersection. Output order is
/// input order.
pub fn filter_devices(
    devices: &[Arc<Device>],
    search_term: &str,
    mode: FilterMode,
) -> Vec<Arc<Device>> {
    let needle = search_term.to_lowercase();

    devices
        .iter()
        .filter(|d| mode.matches(d))
        .filter(|d| needle.is_empty() || matches_search(d, &needle))
        .cloned()
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn device(
        id: i64,
        ip: &str,
        mac: &str,
        hostname: Option<&str>,
        vendor: Option<&str>,
        status: DeviceStatus,
        authorized: bool,
    ) -> Arc<Device> {
        Arc::new(Device {
            id,
            ip_address: ip.into(),
            mac_address: mac.into(),
            hostname: hostname.map(Into::into),
            vendor: vendor.map(Into::into),
            device_type: None,
            status,
            is_authorized: authorized,
            first_seen: Utc.with_ymd_and_hms(2024, 6, 15, 10, 30, 0).unwrap(),
            last_seen: None,
        })
    }

    fn sample() -> Vec<Arc<Device>> {
        vec![
            device(
                1,
                "10.0.0.5",
                "AA:BB:CC:00:00:01",
                Some("printer"),
                Some("HP"),
                DeviceStatus::Online,
                true,
            ),
            device(
                2,
                "10.0.0.6",
                "AA:BB:CC:00:00:02",
                None,
                None,
                DeviceStatus::Offline,
                false,
            ),
            device(
                3,
                "10.0.0.7",
                "AA:BB:CC:00:00:03",
                Some("nas"),
                Some("Synology"),
                DeviceStatus::Online,
                false,
            ),
            device(
                4,
                "10.0.0.8",
                "AA:BB:CC:00:00:04",
                Some("camera"),
                Some("Hikvision"),
                DeviceStatus::Unknown,
                true,
            ),
        ]
    }

    fn ids(devices: &[Arc<Device>]) -> Vec<i64> {
        devices.iter().map(|d| d.id).collect()
    }

    #[test]
    fn all_mode_blank_search_is_identity() {
        let devices = sample();
        assert_eq!(ids(&filter_devices(&devices, "", FilterMode::All)), vec![1, 2, 3, 4]);
    }

    #[test]
    fn output_is_subset_preserving_order() {
        let devices = sample();
        let filtered = filter_devices(&devices, "", FilterMode::Online);
        assert_eq!(ids(&filtered), vec![1, 3]);
    }

    #[test]
    fn filter_is_idempotent() {
        let devices = sample();
        let once = filter_devices(&devices, "a", FilterMode::Unauthorized);
        let twice = filter_devices(&once, "a", FilterMode::Unauthorized);
        assert_eq!(ids(&once), ids(&twice));
    }

    #[test]
    fn unauthorized_mode_ignores_status() {
        let devices = sample();
        let filtered = filter_devices(&devices, "", FilterMode::Unauthorized);
        // One offline, one online — both unauthorized.
        assert_eq!(ids(&filtered), vec![2, 3]);
    }

    #[test]
    fn online_and_offline_exclude_unknown_status() {
        let devices = sample();
        assert!(!ids(&filter_devices(&devices, "", FilterMode::Online)).contains(&4));
        assert!(!ids(&filter_devices(&devices, "", FilterMode::Offline)).contains(&4));
        assert!(ids(&filter_devices(&devices, "", FilterMode::All)).contains(&4));
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let devices = sample();
        // vendor
        assert_eq!(ids(&filter_devices(&devices, "hp", FilterMode::All)), vec![1]);
        // hostname
        assert_eq!(ids(&filter_devices(&devices, "PRINTER", FilterMode::All)), vec![1]);
        // no match
        assert!(filter_devices(&devices, "epson", FilterMode::All).is_empty());
        // mac
        assert_eq!(
            ids(&filter_devices(&devices, "aa:bb:cc:00:00:03", FilterMode::All)),
            vec![3]
        );
    }

    #[test]
    fn absent_fields_do_not_match_the_unknown_placeholder() {
        let devices = sample();
        // Device 2 has no hostname/vendor; the UI renders "Unknown" but the
        // filter must not treat absence as that text.
        assert!(filter_devices(&devices, "unknown", FilterMode::All).is_empty());
    }

    #[test]
    fn mode_and_search_compose_by_intersection() {
        let devices = sample();
        // "10.0.0" matches every device; Offline narrows to id 2.
        assert_eq!(
            ids(&filter_devices(&devices, "10.0.0", FilterMode::Offline)),
            vec![2]
        );
        // "nas" matches id 3 only; Offline excludes it.
        assert!(filter_devices(&devices, "nas", FilterMode::Offline).is_empty());
    }

    #[test]
    fn mode_cycling_wraps() {
        let mut mode = FilterMode::All;
        for expected in [
            FilterMode::Online,
            FilterMode::Offline,
            FilterMode::Unauthorized,
            FilterMode::All,
        ] {
            mode = mode.next();
            assert_eq!(mode, expected);
        }
    }
}
