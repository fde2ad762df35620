//! Human-readable durations for result lines and the run summary.

use std::time::Duration;

const MINUTE_SECS: f64 = 60.0;
const HOUR_SECS: f64 = 60.0 * MINUTE_SECS;

/// Render `duration` in a single unit picked by magnitude.
///
/// - below one second: whole milliseconds, truncated (`"500ms"`)
/// - below one minute: seconds (`"1.2s"`)
/// - below one hour: minutes (`"1.5m"`)
/// - otherwise: hours (`"2h"`)
///
/// Non-millisecond units keep at most two decimals, trailing zeros trimmed.
/// The unit is chosen after rounding, so 59.999s renders as `"1m"`.
pub fn humanize_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 1.0 {
        return format!("{}ms", duration.as_millis());
    }
    let seconds = round_two(secs);
    if seconds < MINUTE_SECS {
        return format!("{}s", two_decimals(seconds));
    }
    let minutes = round_two(secs / MINUTE_SECS);
    if minutes < HOUR_SECS / MINUTE_SECS {
        return format!("{}m", two_decimals(minutes));
    }
    format!("{}h", two_decimals(secs / HOUR_SECS))
}

fn round_two(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn two_decimals(value: f64) -> String {
    let fixed = format!("{value:.2}");
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}
