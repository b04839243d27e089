// Sitepost - A content publishing API for Hugo sites
// Copyright (C) 2025 Sitepost Project Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as
// published by the Free Software Foundation, either version 3 of the
// License, or (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Publication dates
//!
//! Hugo reads `date`, `publishdate` and `expirydate` from front matter, so the
//! typed dates of a record are projected into its params as RFC 3339 strings
//! before every write.

use chrono::{
    DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone,
};
use serde::{Deserialize, Deserializer};

use crate::error::{ContentError, Result};
use crate::models::ContentRecord;

/// Unix timestamp of `0001-01-01T00:00:00Z`, the "unset" instant
const ZERO_INSTANT: i64 = -62_135_596_800;

pub const DATE_KEY: &str = "date";
pub const PUBLISH_DATE_KEY: &str = "publishdate";
pub const EXPIRY_DATE_KEY: &str = "expirydate";

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

pub fn is_zero(date: &DateTime<FixedOffset>) -> bool {
    date.timestamp() == ZERO_INSTANT && date.timestamp_subsec_nanos() == 0
}

fn present(date: &Option<DateTime<FixedOffset>>) -> Option<&DateTime<FixedOffset>> {
    date.as_ref().filter(|d| !is_zero(d))
}

/// Format a date in local time with as much sub-second precision as it carries
pub fn format_local(date: &DateTime<FixedOffset>) -> String {
    date.with_timezone(&Local)
        .to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Copy the record's dates into its params and check their ordering
pub fn set_dates(record: &mut ContentRecord) -> Result<()> {
    let projections = [
        (DATE_KEY, present(&record.date).map(format_local)),
        (PUBLISH_DATE_KEY, present(&record.publish_date).map(format_local)),
        (EXPIRY_DATE_KEY, present(&record.expiry_date).map(format_local)),
    ];
    for (key, value) in projections {
        if let Some(value) = value {
            record.params.insert(key.to_string(), value);
        }
    }

    if let (Some(publish), Some(expiry)) =
        (present(&record.publish_date), present(&record.expiry_date))
    {
        if publish > expiry {
            return Err(ContentError::Validation(
                "publishdate after expirydate".to_string(),
            ));
        }
    }

    Ok(())
}

fn from_local(naive: NaiveDateTime) -> Option<DateTime<FixedOffset>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|d| d.fixed_offset())
}

/// Parse a client-supplied date
///
/// Accepts RFC 3339, a date-time without offset (local time) or a bare date
/// (local midnight).
pub fn parse_date(input: &str) -> std::result::Result<DateTime<FixedOffset>, String> {
    let input = input.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(input) {
        return Ok(date);
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
            return from_local(naive).ok_or_else(|| format!("'{}' does not exist in local time", input));
        }
    }

    if let Ok(day) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(naive) = day.and_hms_opt(0, 0, 0) {
            return from_local(naive).ok_or_else(|| format!("'{}' does not exist in local time", input));
        }
    }

    Err(format!("invalid date '{}'", input))
}

/// Serde adapter for optional dates; empty strings and `null` mean absent
pub fn deserialize_optional<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_date(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
