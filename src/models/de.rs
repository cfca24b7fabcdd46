// Lenient field decoders for API payloads
// The API is not consistent about empty strings vs null, or dates vs datetimes

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use serde::de::Error;
use serde::{Deserialize, Deserializer};

use super::id::ResourceId;

const NAIVE_DATETIME: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Null, missing or blank reference -> None
pub fn optional_id<'de, D>(deserializer: D) -> Result<Option<ResourceId>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = Option::<ResourceId>::deserialize(deserializer)?;
    Ok(match id {
        Some(ResourceId::Text(s)) if s.trim().is_empty() => None,
        other => other,
    })
}

/// Due dates arrive as `2024-01-01` or as a full timestamp; both reduce to a
/// local calendar day
pub fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_calendar_date(s)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid date: {}", s))),
    }
}

pub fn timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {}", raw)))
}

pub fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_timestamp(s)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp: {}", s))),
    }
}

pub(crate) fn parse_calendar_date(s: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).date_naive());
    }
    NaiveDateTime::parse_from_str(s, NAIVE_DATETIME)
        .ok()
        .map(|dt| dt.date())
}

/// Timestamps without an offset are taken as UTC
fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, NAIVE_DATETIME)
        .ok()
        .map(|dt| dt.and_utc())
}
