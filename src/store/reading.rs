//! The persisted reading record and its storage mapping.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use crate::store::error::{StoreError, StoreResult};

/// Columns selected for every reading query, in `from_row` order.
pub(crate) const READING_COLUMNS: &str = "id, date_time, blood_sugar, meal_type";

/// One blood-sugar measurement.
///
/// Serializes to the wire shape
/// `{id, date_time: "YYYY-MM-DD HH:MM:SS", blood_sugar, meal_type}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Store-assigned identifier, never reused.
    pub id: i64,
    /// When the reading was taken (UTC).
    #[serde(rename = "date_time", with = "date_time_format")]
    pub recorded_at: DateTime<Utc>,
    /// The measured value. No unit or range is implied.
    pub blood_sugar: f64,
    /// Free-text meal label, e.g. "Breakfast".
    pub meal_type: Option<String>,
}

impl Reading {
    /// Map a row selected with [`READING_COLUMNS`].
    pub(crate) fn from_row(row: &Row<'_>) -> StoreResult<Self> {
        let stamp: String = row.get(1)?;
        Ok(Self {
            id: row.get(0)?,
            recorded_at: decode_timestamp(&stamp)?,
            blood_sugar: row.get(2)?,
            meal_type: row.get(3)?,
        })
    }
}

/// Storage form of a timestamp: fixed-width RFC 3339 so that text order is
/// chronological order.
pub(crate) fn encode_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn decode_timestamp(raw: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| StoreError::Corrupt(format!("invalid date_time '{raw}': {err}")))
}

mod date_time_format {
    use super::*;
    use serde::{Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&at.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT)
            .map(|naive| naive.and_utc())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Reading {
        Reading {
            id: 7,
            recorded_at: Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap(),
            blood_sugar: 5.4,
            meal_type: Some("Breakfast".into()),
        }
    }

    #[test]
    fn test_wire_shape() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "date_time": "2024-03-09 07:05:01",
                "blood_sugar": 5.4,
                "meal_type": "Breakfast",
            })
        );
    }

    #[test]
    fn test_missing_meal_type_serializes_as_null() {
        let mut reading = sample();
        reading.meal_type = None;
        let json = serde_json::to_value(reading).unwrap();
        assert!(json["meal_type"].is_null());
    }

    #[test]
    fn test_wire_date_time_drops_subseconds() {
        let mut reading = sample();
        reading.recorded_at = reading.recorded_at + chrono::Duration::milliseconds(750);
        let json = serde_json::to_value(reading).unwrap();
        assert_eq!(json["date_time"], "2024-03-09 07:05:01");
    }

    #[test]
    fn test_timestamp_encoding_sorts_chronologically() {
        let early = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let late = early + chrono::Duration::microseconds(1);
        assert!(encode_timestamp(&early) < encode_timestamp(&late));
        assert_eq!(encode_timestamp(&early).len(), encode_timestamp(&late).len());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(decode_timestamp("yesterday"), Err(StoreError::Corrupt(_))));
        let at = Utc.with_ymd_and_hms(2023, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(decode_timestamp(&encode_timestamp(&at)).unwrap(), at);
    }
}
