//! Expiry timestamp handling for the ECS API.
//!
//! ECS reports OV/EV expiry as `%Y-%m-%dT%H:%M:%SZ` strings. The serde
//! functions here accept that form (and any other valid RFC3339 timestamp)
//! and serialize back to the same shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// ECS timestamp format, RFC3339 with seconds precision and a literal `Z`.
const ECS_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Serialize `Option<DateTime<Utc>>` as an ECS timestamp string.
pub fn serialize<S>(dt: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => serializer.serialize_some(&dt.format(ECS_TIMESTAMP_FORMAT).to_string()),
        None => serializer.serialize_none(),
    }
}

/// Deserialize an optional RFC3339 timestamp string.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<String>::deserialize(deserializer)? {
        Some(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| Some(dt.with_timezone(&Utc)))
            .map_err(|e| Error::custom(format!("Invalid ECS timestamp '{s}': {e}"))),
        None => Ok(None),
    }
}

/// Whole days from now until `expiry`. Negative once the date has passed.
pub(crate) fn days_remaining(expiry: &DateTime<Utc>) -> i64 {
    (*expiry - Utc::now()).num_days()
}
