// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Start-time normalization for the creation path.
//!
//! Timing input arrives in two forms and is resolved in a fixed order:
//!
//! 1. a pre-combined RFC 3339 instant (`starts_at`);
//! 2. a calendar date (`YYYY-MM-DD`) plus a 24-hour `HH:MM` time, combined
//!    as UTC wall-clock time.
//!
//! An unparseable combined value falls through to the split fields rather
//! than failing, so a bad `starts_at` does not block a valid date/time
//! pair. The split path is strict: once both fields are present, any
//! invalid component rejects the request. With no usable input at all the
//! table is created untimed, which is a valid outcome.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use tracing::debug;

use crate::error::CoreError;

/// Parse an RFC 3339 instant, normalized to UTC.
pub(crate) fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Strict 24-hour `HH:MM` parser: two digits, colon, two digits, with
/// hours in 00-23 and minutes in 00-59.
fn parse_clock_time(raw: &str) -> Option<NaiveTime> {
    let (hours, minutes) = raw.split_once(':')?;
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    if !hours.bytes().all(|b| b.is_ascii_digit()) || !minutes.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour: u32 = hours.parse().ok()?;
    let minute: u32 = minutes.parse().ok()?;
    // from_hms_opt enforces the 00-23 / 00-59 ranges
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Resolve heterogeneous timing inputs to a single start instant.
///
/// Returns `Ok(None)` for an untimed table. Returns a
/// [`CoreError::ValidationError`] only from the split date/time path; see
/// the module docs for the resolution order.
pub fn resolve_starts_at(
    starts_at: Option<&str>,
    date: Option<&str>,
    time: Option<&str>,
) -> Result<Option<DateTime<Utc>>, CoreError> {
    // 1. Pre-combined instant, if it parses
    if let Some(raw) = starts_at {
        match parse_instant(raw) {
            Some(instant) => return Ok(Some(instant)),
            None => {
                debug!(starts_at = raw, "Combined start time unparseable, trying split fields");
            }
        }
    }

    // 2. Split date + time, validated strictly
    if let (Some(date_raw), Some(time_raw)) = (date, time) {
        let date = NaiveDate::parse_from_str(date_raw, "%Y-%m-%d").map_err(|e| {
            CoreError::ValidationError {
                field: "date".to_string(),
                message: format!("'{}' is not a valid calendar date: {}", date_raw, e),
            }
        })?;

        let time = parse_clock_time(time_raw).ok_or_else(|| CoreError::ValidationError {
            field: "time".to_string(),
            message: format!(
                "'{}' must be a 24-hour HH:MM time (hours 00-23, minutes 00-59)",
                time_raw
            ),
        })?;

        return Ok(Some(date.and_time(time).and_utc()));
    }

    // 3. Nothing usable: the table is untimed
    Ok(None)
}
