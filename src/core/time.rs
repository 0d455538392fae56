//! Timestamps and Rounding
//!
//! Profile timestamps are human-readable local-time strings, and every
//! duration or percentage surfaced to clients is rounded to one decimal.

use chrono::Local;

/// Format used for `date_created` / `last_played` / history timestamps.
pub const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Current local time as a profile timestamp string.
pub fn now_stamp() -> String {
    Local::now().format(STAMP_FORMAT).to_string()
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
