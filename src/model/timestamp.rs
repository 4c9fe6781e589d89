use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Naive layouts seen in the wild. CKAN stores times in UTC but most
/// versions omit the offset.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// A CKAN timestamp, normalised to UTC.
///
/// Every format variant accepted by the catalogs is handled here and nowhere
/// else. Encoding always produces RFC 3339 with a `Z` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    pub fn into_datetime(self) -> DateTime<Utc> {
        self.0
    }

    /// Parses any of the accepted textual forms.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();

        if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
            return Some(Self(dt.with_timezone(&Utc)));
        }
        for fmt in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(text, fmt) {
                return Some(Self(dt.with_timezone(&Utc)));
            }
        }
        for fmt in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
                return Some(Self(naive.and_utc()));
            }
        }
        NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| Self(naive.and_utc()))
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(at: DateTime<Utc>) -> Self {
        Self(at)
    }
}

impl FromStr for Timestamp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unrecognised timestamp format: {s:?}"))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct TimestampVisitor;

impl Visitor<'_> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a date/time string such as 2013-05-09T14:08:32.666477")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Timestamp, E> {
        v.parse().map_err(E::custom)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(TimestampVisitor)
    }
}

/// A date field as a catalog sent it.
///
/// Recognised layouts become [`DateValue::At`]. Empty strings and text that
/// matches no layout are kept in [`DateValue::Text`] and encode back
/// unchanged, so one odd field does not fail the whole record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DateValue {
    At(Timestamp),
    Text(String),
}

impl DateValue {
    /// The instant, when the field held a recognised date.
    pub fn timestamp(&self) -> Option<&Timestamp> {
        match self {
            DateValue::At(t) => Some(t),
            DateValue::Text(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DateValue::Text(s) if s.is_empty())
    }
}

impl From<Timestamp> for DateValue {
    fn from(t: Timestamp) -> Self {
        DateValue::At(t)
    }
}

impl From<DateTime<Utc>> for DateValue {
    fn from(at: DateTime<Utc>) -> Self {
        DateValue::At(Timestamp(at))
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateValue::At(t) => fmt::Display::fmt(t, f),
            DateValue::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for DateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct DateValueVisitor;

impl Visitor<'_> for DateValueVisitor {
    type Value = DateValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a date/time string or epoch milliseconds")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<DateValue, E> {
        Ok(Timestamp::parse(v)
            .map(DateValue::At)
            .unwrap_or_else(|| DateValue::Text(v.to_string())))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<DateValue, E> {
        DateTime::from_timestamp_millis(v)
            .map(DateValue::from)
            .ok_or_else(|| E::custom(format!("epoch milliseconds out of range: {v}")))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<DateValue, E> {
        let millis = i64::try_from(v)
            .map_err(|_| E::custom(format!("epoch milliseconds out of range: {v}")))?;
        self.visit_i64(millis)
    }
}

impl<'de> Deserialize<'de> for DateValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DateValueVisitor)
    }
}
