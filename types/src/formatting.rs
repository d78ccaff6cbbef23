//! Centralized number and duration formatting utilities.
//!
//! All numeric display formatting goes through this module so that result
//! payloads and CLI output stay consistent with each other.

/// Format an encounter-relative millisecond offset as `m:ss` or `m:ss.t`.
///
/// # Examples
/// ```
/// use vigil_types::formatting::format_duration;
/// assert_eq!(format_duration(0, false), "0:00");
/// assert_eq!(format_duration(83_000, false), "1:23");
/// assert_eq!(format_duration(83_500, true), "1:23.5");
/// ```
pub fn format_duration(millis: i64, tenths: bool) -> String {
    let millis = millis.max(0);
    let total_seconds = millis / 1000;
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    if tenths {
        let t = (millis % 1000) / 100;
        format!("{minutes}:{seconds:02}.{t}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Format a large number with K/M suffix for compact display.
///
/// - Values >= 1,000,000 are formatted as `X.XXM`
/// - Values >= 1,000 are formatted as `X.XXK`
/// - Values below 1,000 are formatted as-is
///
/// # Examples
/// ```
/// use vigil_types::formatting::format_compact;
/// assert_eq!(format_compact(500), "500");
/// assert_eq!(format_compact(1_500), "1.50K");
/// assert_eq!(format_compact(2_350_000), "2.35M");
/// ```
pub fn format_compact(n: i64) -> String {
    let abs = n.abs();
    if abs >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if abs >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        format!("{n}")
    }
}

/// Format a ratio as a percentage with one decimal place.
///
/// # Examples
/// ```
/// use vigil_types::formatting::format_percent;
/// assert_eq!(format_percent(92.5), "92.5%");
/// ```
pub fn format_percent(percent: f64) -> String {
    format!("{percent:.1}%")
}
