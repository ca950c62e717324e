//! Utility functions for callscope

use crate::{Error, Result};

/// Clamp a time to `[0, total]`
///
/// NaN collapses to 0 so a bad input can never escape the timeline.
#[must_use]
pub fn clamp_time(time: f64, total: f64) -> f64 {
    if time.is_nan() {
        return 0.0;
    }
    time.clamp(0.0, total.max(0.0))
}

/// Format a playback position as `MM:SS`, flooring fractional seconds
///
/// Minutes are not wrapped into hours; a 75 minute call reads `75:00`.
#[must_use]
pub fn format_timestamp(seconds: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total_seconds = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let minutes = total_seconds / 60;
    let secs = total_seconds % 60;

    format!("{minutes:02}:{secs:02}")
}

/// Format duration in seconds to human readable format
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total_seconds = seconds.max(0.0).round() as u64;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let secs = total_seconds % 60;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Parse `SS`, `MM:SS` or `HH:MM:SS` back to seconds
///
/// # Errors
///
/// Returns a validation error if the string has more than three parts or
/// any part is not a non-negative number.
pub fn parse_duration(duration_str: &str) -> Result<f64> {
    let invalid = || Error::validation("duration", format!("invalid duration '{duration_str}'"));

    let parts = duration_str
        .trim()
        .split(':')
        .map(|part| {
            part.parse::<f64>()
                .ok()
                .filter(|value| value.is_finite() && *value >= 0.0)
        })
        .collect::<Option<Vec<f64>>>()
        .ok_or_else(invalid)?;

    match parts.as_slice() {
        [seconds] => Ok(*seconds),
        [minutes, seconds] => Ok(minutes.mul_add(60.0, *seconds)),
        [hours, minutes, seconds] => Ok(hours.mul_add(3600.0, minutes.mul_add(60.0, *seconds))),
        _ => Err(invalid()),
    }
}

/// Validate a call identifier
///
/// Ids double as file stems, so only ASCII alphanumerics, `_` and `-` are
/// accepted.
#[must_use]
pub fn validate_call_id(call_id: &str) -> bool {
    !call_id.is_empty()
        && call_id.len() <= 128
        && call_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// File name holding a call record
///
/// # Errors
///
/// Returns a validation error if the call id is not a safe file stem.
pub fn call_file_name(call_id: &str) -> Result<String> {
    if validate_call_id(call_id) {
        Ok(format!("{call_id}.json"))
    } else {
        Err(Error::validation(
            "call_id",
            format!("'{call_id}' is not a valid call id"),
        ))
    }
}
