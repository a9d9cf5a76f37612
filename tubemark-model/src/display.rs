//! Human-facing renderings of stored numbers, as the popup shows them.

use crate::tracking::Tracking;

/// `m:ss` below an hour, `h:mm:ss` from an hour on. Fractions are dropped.
pub fn time_label(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let minutes = total / 60;
    let secs = total % 60;
    if total >= 3600 {
        format!("{}:{:02}:{:02}", total / 3600, minutes % 60, secs)
    } else {
        format!("{minutes}:{secs:02}")
    }
}

/// Watched share of the video in percent, `0` when unknown or removed.
pub fn progress_percent(tracking: Tracking, duration: f64) -> f64 {
    match tracking.position() {
        Some(position) if duration > 0.0 => {
            (position / duration * 100.0).clamp(0.0, 100.0)
        }
        _ => 0.0,
    }
}
