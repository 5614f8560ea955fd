//! Timeline timecode formatting
//!
//! Provides consistent display of clip positions and durations in logs and
//! CLI output.

/// Format thresholds (seconds)
const SHORT_FORMAT_MAX: f64 = 60.0; // < 1m → X.XXs
const MEDIUM_FORMAT_MAX: f64 = 3600.0; // < 1h → M:SS.SS
                                       // >= 1h → H:MM:SS

/// Format a timeline position or duration
///
/// # Examples
///
/// ```
/// use mvg_common::timecode::format_timecode;
///
/// assert_eq!(format_timecode(4.5), "4.50s");
/// assert_eq!(format_timecode(125.25), "2:05.25");
/// assert_eq!(format_timecode(3725.0), "1:02:05");
/// assert_eq!(format_timecode(-2.0), "-2.00s");
/// ```
pub fn format_timecode(seconds: f64) -> String {
    if !seconds.is_finite() {
        return "--".to_string();
    }

    let is_negative = seconds < 0.0;
    let abs_seconds = seconds.abs();

    let formatted = if abs_seconds < SHORT_FORMAT_MAX {
        format!("{:.2}s", abs_seconds)
    } else if abs_seconds < MEDIUM_FORMAT_MAX {
        let minutes = (abs_seconds / 60.0).floor();
        let secs = abs_seconds - minutes * 60.0;
        format!("{}:{:05.2}", minutes as u64, secs)
    } else {
        let whole = abs_seconds.round() as u64;
        let hours = whole / 3600;
        let mins = (whole % 3600) / 60;
        let secs = whole % 60;
        format!("{}:{:02}:{:02}", hours, mins, secs)
    };

    if is_negative {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

/// Format a time range as `start → end`
pub fn format_range(start: f64, duration: f64) -> String {
    format!("{} → {}", format_timecode(start), format_timecode(start + duration))
}
