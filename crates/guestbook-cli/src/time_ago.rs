//! Relative "time ago" labels for greeting timestamps.

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Describe how long before `now_ms` the instant `timestamp_ms` was, at the
/// coarsest whole unit (days, hours, minutes). Anything under a minute, or
/// in the future, is "just now".
pub fn format_time_ago(now_ms: i64, timestamp_ms: i64) -> String {
  let diff = now_ms.saturating_sub(timestamp_ms);

  let (n, unit) = if diff >= DAY_MS {
    (diff / DAY_MS, "day")
  } else if diff >= HOUR_MS {
    (diff / HOUR_MS, "hour")
  } else if diff >= MINUTE_MS {
    (diff / MINUTE_MS, "minute")
  } else {
    return "just now".to_string();
  };

  if n == 1 {
    format!("1 {unit} ago")
  } else {
    format!("{n} {unit}s ago")
  }
}
