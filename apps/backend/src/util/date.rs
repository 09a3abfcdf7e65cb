use time::macros::format_description;
use time::OffsetDateTime;

/// Current UTC time as `YYYY-MM-DD HH:MM:SS`.
pub fn now() -> String {
    format_datetime(now_js())
}

pub fn now_js() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

/// Milliseconds since the Unix epoch.
pub fn now_time() -> i64 {
    (now_js().unix_timestamp_nanos() / 1_000_000) as i64
}

pub fn format_datetime(dt: OffsetDateTime) -> String {
    dt.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ))
    .unwrap_or_default()
}
