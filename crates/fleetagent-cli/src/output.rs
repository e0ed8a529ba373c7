//! Formatted output helpers for CLI commands.

use std::time::Duration;

/// Formats a duration as seconds with two decimals, or milliseconds below
/// one second (e.g., "1.30s", "250ms").
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    if duration < Duration::from_secs(1) {
        format!("{}ms", duration.as_millis())
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}
