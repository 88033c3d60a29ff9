//! Zulu timestamp codec
//!
//! Wire format for every date field the service exchanges:
//! `YYYY-MM-DDThh:mm:ss.fffZ`. Parsing accepts either 3 or 6 fractional
//! digits (the service emits both); the value is interpreted at millisecond
//! precision, so a 6-digit fraction is truncated to its first three digits.
//! Formatting always emits exactly 3 fractional digits. Timestamps are UTC
//! by convention; no offsets other than the literal `Z` are handled.

use chrono::{DateTime, NaiveDateTime, TimeZone, Timelike, Utc};

use crate::error::{ClientError, Result};

const SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const ZULU_MILLIS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
const ZULU_SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parse a wire timestamp, e.g. `2017-01-05T16:45:23.332Z`.
///
/// # Errors
/// Returns `ClientError::Format` carrying the offending string when the
/// input does not match the Zulu pattern with a 3- or 6-digit fraction.
pub fn parse_zulu(value: &str) -> Result<DateTime<Utc>> {
    let (seconds_part, fraction) = split_zulu(value)?;

    let naive = NaiveDateTime::parse_from_str(seconds_part, SECONDS_FORMAT)
        .map_err(|err| format_error(value, err.to_string()))?;

    // Millisecond precision: only the first three fractional digits carry
    // value, whether the field has 3 or 6 of them.
    let millis: u32 = fraction[..3]
        .parse()
        .map_err(|_| format_error(value, "non-numeric fractional seconds".to_string()))?;
    let naive = naive
        .with_nanosecond(millis * 1_000_000)
        .ok_or_else(|| format_error(value, "fractional seconds out of range".to_string()))?;

    Ok(Utc.from_utc_datetime(&naive))
}

/// Format a timestamp with exactly 3 fractional digits, e.g.
/// `2017-01-05T16:45:23.000Z`.
pub fn format_zulu(timestamp: DateTime<Utc>) -> String {
    timestamp.format(ZULU_MILLIS_FORMAT).to_string()
}

/// Format a timestamp with no fractional part, e.g. `2017-01-05T16:45:23Z`.
pub fn format_zulu_no_millis(timestamp: DateTime<Utc>) -> String {
    timestamp.format(ZULU_SECONDS_FORMAT).to_string()
}

fn split_zulu(value: &str) -> Result<(&str, &str)> {
    let body = value
        .strip_suffix('Z')
        .ok_or_else(|| format_error(value, "missing 'Z' suffix".to_string()))?;
    let (seconds_part, fraction) = body
        .split_once('.')
        .ok_or_else(|| format_error(value, "missing fractional seconds".to_string()))?;

    if fraction.len() != 3 && fraction.len() != 6 {
        return Err(format_error(value, "fractional seconds must be 3 or 6 digits".to_string()));
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format_error(value, "non-numeric fractional seconds".to_string()));
    }

    Ok((seconds_part, fraction))
}

fn format_error(value: &str, detail: String) -> ClientError {
    ClientError::Format { value: value.to_string(), detail }
}
