//! The telemetry data model.
//!
//! A [`Reading`] is one timestamped sample of the four station metrics. Each
//! metric is `Option<f64>`: `None` is the not-a-number sentinel used when the
//! sensor omitted the field or sent something non-numeric. It serializes as
//! JSON `null` and is stored as SQL `NULL`, so a partially failing sensor
//! still produces a row.

use serde::{Deserialize, Serialize};

/// A stored reading. `id` is assigned by the store on append and is strictly
/// increasing with insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub id: i64,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub noise_level: Option<f64>,
    /// Server-assigned RFC 3339 UTC instant, set at receipt time. Client
    /// timestamps are never trusted. Display data only; ordering is by `id`.
    pub timestamp: String,
}

/// A normalized reading that has not been appended yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReading {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
    pub noise_level: Option<f64>,
    pub timestamp: String,
}

impl NewReading {
    /// Attach the store-assigned id.
    pub fn into_reading(self, id: i64) -> Reading {
        Reading {
            id,
            temperature: self.temperature,
            humidity: self.humidity,
            wind_speed: self.wind_speed,
            noise_level: self.noise_level,
            timestamp: self.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_are_camel_case() {
        let reading = Reading {
            id: 7,
            temperature: Some(21.5),
            humidity: None,
            wind_speed: Some(3.0),
            noise_level: None,
            timestamp: "2026-01-01T00:00:00.000Z".to_string(),
        };

        let json = serde_json::to_value(&reading).unwrap();
        assert_eq!(json["windSpeed"], serde_json::json!(3.0));
        assert_eq!(json["noiseLevel"], serde_json::Value::Null);
        assert_eq!(json["humidity"], serde_json::Value::Null);
        assert_eq!(json["id"], serde_json::json!(7));
    }

    #[test]
    fn test_into_reading_preserves_fields() {
        let new = NewReading {
            temperature: Some(12.0),
            humidity: Some(55.0),
            wind_speed: None,
            noise_level: Some(40.0),
            timestamp: "2026-01-01T00:00:00.000Z".to_string(),
        };

        let reading = new.clone().into_reading(42);
        assert_eq!(reading.id, 42);
        assert_eq!(reading.temperature, new.temperature);
        assert_eq!(reading.wind_speed, None);
        assert_eq!(reading.timestamp, new.timestamp);
    }
}
