//! Conversions between wall-clock time and reference seconds
//!
//! Expiration instants are seconds since 2001-01-01T00:00:00Z, stored as `f64`.

use chrono::{DateTime, Local, TimeZone, Utc};

pub use credential_store::REFERENCE_EPOCH_UNIX_OFFSET;

/// Rendering used for expiration dates (`d. MMM yyyy HH:mm:ss`)
pub const EXPIRATION_FORMAT: &str = "%-d. %b %Y %H:%M:%S";

#[allow(clippy::cast_precision_loss)]
pub fn to_reference_seconds(instant: DateTime<Utc>) -> f64 {
    let seconds = instant.timestamp() - REFERENCE_EPOCH_UNIX_OFFSET;
    seconds as f64 + f64::from(instant.timestamp_subsec_nanos()) / 1e9
}

/// `None` when the instant is outside the range chrono can represent
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn from_reference_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    // i64 covers far more than chrono's range, so out-of-range values fail below
    if whole.abs() > 1e15 {
        return None;
    }
    let nanos = ((seconds - whole) * 1e9).round().min(999_999_999.0) as u32;
    DateTime::from_timestamp(whole as i64 + REFERENCE_EPOCH_UNIX_OFFSET, nanos)
}

/// Render an expiration instant in the local time zone
pub fn format_expiration(seconds: f64) -> String {
    format_expiration_in(seconds, &Local)
}

/// Render an expiration instant in `zone`; unrepresentable instants render as the raw number
pub fn format_expiration_in<Tz>(seconds: f64, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    match from_reference_seconds(seconds) {
        Some(instant) => instant
            .with_timezone(zone)
            .format(EXPIRATION_FORMAT)
            .to_string(),
        None => seconds.to_string(),
    }
}
