//! Timestamp values.

use chrono::{DateTime, Utc};
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{Error as DeError, Visitor},
};
use std::fmt;

use super::TIMESTAMP_NEWTYPE;

/// A point in time, stored as the document-native timestamp scalar.
///
/// The wire representation is milliseconds since the Unix epoch; [`chrono`]
/// conversions are provided for everything else.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use doclens::Timestamp;
///
/// let moment = Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap();
/// let ts = Timestamp::from(moment);
/// assert_eq!(ts.to_datetime(), Some(moment));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from milliseconds since the Unix epoch.
    pub fn from_millis(millis: i64) -> Self {
        Timestamp(millis)
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        Timestamp(Utc::now().timestamp_millis())
    }

    /// Returns milliseconds since the Unix epoch.
    pub fn millis(&self) -> i64 {
        self.0
    }

    /// Converts to a [`DateTime`], or `None` when out of chrono's range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Timestamp(value.timestamp_millis())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(datetime) => write!(f, "{}", datetime.to_rfc3339()),
            None => write!(f, "{}ms", self.0),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_newtype_struct(TIMESTAMP_NEWTYPE, &self.0)
    }
}

struct TimestampVisitor;

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a timestamp in epoch milliseconds")
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Timestamp, D::Error>
    where
        D: Deserializer<'de>,
    {
        i64::deserialize(deserializer).map(Timestamp)
    }

    fn visit_i64<E>(self, value: i64) -> Result<Timestamp, E>
    where
        E: DeError,
    {
        Ok(Timestamp(value))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Timestamp, E>
    where
        E: DeError,
    {
        i64::try_from(value)
            .map(Timestamp)
            .map_err(|_| E::custom(format!("timestamp {value} out of range")))
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_newtype_struct(TIMESTAMP_NEWTYPE, TimestampVisitor)
    }
}
