//! Human-readable duration formatting for log output
//!
//! - Short format (`X.XXs`): under 100 seconds
//! - Medium format (`M:SS.X`): 100 seconds and above

/// Values at or above this use the medium format
const SHORT_FORMAT_MAX: f64 = 100.0;

/// Format fractional seconds for display.
///
/// Negative values keep their sign; non-finite values print as-is.
///
/// # Examples
///
/// ```
/// use standup_common::human_time::format_seconds;
///
/// assert_eq!(format_seconds(4.5), "4.50s");
/// assert_eq!(format_seconds(125.0), "2:05.0");
/// assert_eq!(format_seconds(-5.0), "-5.00s");
/// ```
pub fn format_seconds(seconds: f64) -> String {
    if !seconds.is_finite() {
        return format!("{}s", seconds);
    }

    let is_negative = seconds < 0.0;
    let abs_seconds = seconds.abs();

    let formatted = if abs_seconds < SHORT_FORMAT_MAX {
        format!("{:.2}s", abs_seconds)
    } else {
        let minutes = (abs_seconds / 60.0).floor();
        let secs = abs_seconds - minutes * 60.0;
        format!("{}:{:04.1}", minutes as u64, secs)
    };

    if is_negative {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

/// Format an optional duration, `"off"` when absent.
pub fn format_seconds_opt(seconds: Option<f64>) -> String {
    match seconds {
        Some(s) => format_seconds(s),
        None => "off".to_string(),
    }
}
