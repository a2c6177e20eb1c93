//! Compact relative-time formatting for the device table.

use chrono::{DateTime, Utc};

/// Format a timestamp relative to `now` ("42s ago", "5m ago", "3d ago").
pub fn relative(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - ts).num_seconds();
    if secs < 0 {
        // Clock skew between client and backend — don't print negatives.
        return "just now".into();
    }
    match secs {
        0..=59 => format!("{secs}s ago"),
        60..=3_599 => format!("{}m ago", secs / 60),
        3_600..=86_399 => format!("{}h ago", secs / 3_600),
        _ => format!("{}d ago", secs / 86_400),
    }
}

/// Format an optional last-seen timestamp; `None` means the device was
/// never observed online since discovery.
pub fn last_seen(ts: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    ts.map_or_else(|| "never".into(), |t| relative(t, now))
}
