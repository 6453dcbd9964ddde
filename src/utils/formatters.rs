use chrono::{DateTime, Datelike, SecondsFormat, Utc};

/// Formats an epoch-millisecond instant as an ISO-8601 UTC string
/// with millisecond precision, e.g. `2023-11-14T22:13:20.000Z`.
/// Years outside 0000-9999 use the expanded six-digit signed form
/// (`+010000-01-01T00:00:00.000Z`). Fractional milliseconds are truncated toward zero.
/// Returns None if the value is not finite or outside chrono's supported range
pub fn format_epoch_millis(millis: f64) -> Option<String> {
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    let dt = DateTime::<Utc>::from_timestamp_millis(millis.trunc() as i64)?;
    let year = dt.year();
    if (0..=9999).contains(&year) {
        Some(dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    } else {
        let sign = if year < 0 { '-' } else { '+' };
        Some(format!(
            "{}{:06}-{}",
            sign,
            year.unsigned_abs(),
            dt.format("%m-%dT%H:%M:%S%.3fZ")
        ))
    }
}

/// Formats a score with a single decimal place, used in log lines
pub fn format_score(score: f64) -> String {
    format!("{:.1}", score)
}
