//! Lenient date (de)serialization for resume dates.
//!
//! Extraction agents emit dates in whatever shape the source resume used. Accepted:
//! `YYYY-MM-DD`, `YYYY-MM` (first of month) and RFC 3339 timestamps (date part kept).
//! For the optional end date, `null`, an empty string, or "present"/"current" mean
//! the position is ongoing. Output is always `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate};
use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a single date string in one of the accepted shapes.
pub fn parse_flexible(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{raw}-01"), DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    // "2021-03-01T00:00:00" without an offset
    raw.split_once('T')
        .and_then(|(date, _)| NaiveDate::parse_from_str(date, DATE_FORMAT).ok())
}

fn is_ongoing(raw: &str) -> bool {
    let lower = raw.trim().to_lowercase();
    lower.is_empty() || matches!(lower.as_str(), "present" | "current" | "now" | "ongoing")
}

pub mod required {
    use super::*;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_flexible(&raw).ok_or_else(|| D::Error::custom(format!("unrecognised date '{raw}'")))
    }
}

pub mod optional {
    use super::*;

    pub fn serialize<S: Serializer>(
        date: &Option<NaiveDate>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&d.format(DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) if is_ongoing(&s) => Ok(None),
            Some(s) => parse_flexible(&s)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("unrecognised date '{s}'"))),
        }
    }
}
