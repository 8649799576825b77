//! Time formatting helpers for log lines.

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// Render a duration in seconds using its two most significant units,
/// dropping a zero remainder (`7200` → `"2h"`, `5400` → `"1h 30m"`).
pub fn format_duration(secs: u64) -> String {
    let (major, major_unit, minor, minor_unit) = if secs < MINUTE {
        return format!("{secs}s");
    } else if secs < HOUR {
        (secs / MINUTE, "m", secs % MINUTE, "s")
    } else if secs < DAY {
        (secs / HOUR, "h", (secs % HOUR) / MINUTE, "m")
    } else {
        (secs / DAY, "d", (secs % DAY) / HOUR, "h")
    };
    if minor == 0 {
        format!("{major}{major_unit}")
    } else {
        format!("{major}{major_unit} {minor}{minor_unit}")
    }
}
