//! Payload normalization for the ingest path.
//!
//! The sensor body is an untrusted JSON object. Each metric field is coerced
//! independently; a field that cannot be coerced becomes the `None` sentinel
//! instead of failing the whole request, so one broken sensor channel never
//! blocks the pipeline. Malformed JSON is the only hard failure and is
//! rejected before this module runs.

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::reading::NewReading;

/// Coerce a single metric field. JSON numbers pass through, numeric strings
/// parse, everything else (missing, null, garbage) is the sentinel.
fn coerce_metric(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Build a canonical [`NewReading`] from an inbound body. The timestamp is
/// the current server instant; any client-supplied timestamp is ignored.
pub fn normalize(body: &Map<String, Value>) -> NewReading {
    NewReading {
        temperature: coerce_metric(body.get("temperature")),
        humidity: coerce_metric(body.get("humidity")),
        wind_speed: coerce_metric(body.get("windSpeed")),
        noise_level: coerce_metric(body.get("noiseLevel")),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_numbers_pass_through() {
        let reading = normalize(&body(json!({
            "temperature": 21.5,
            "humidity": 40,
            "windSpeed": 3.2,
            "noiseLevel": 55.0,
        })));

        assert_eq!(reading.temperature, Some(21.5));
        assert_eq!(reading.humidity, Some(40.0));
        assert_eq!(reading.wind_speed, Some(3.2));
        assert_eq!(reading.noise_level, Some(55.0));
    }

    #[test]
    fn test_numeric_strings_coerce() {
        let reading = normalize(&body(json!({
            "temperature": "23.5",
            "humidity": " 61 ",
            "windSpeed": "0",
            "noiseLevel": "4e1",
        })));

        assert_eq!(reading.temperature, Some(23.5));
        assert_eq!(reading.humidity, Some(61.0));
        assert_eq!(reading.wind_speed, Some(0.0));
        assert_eq!(reading.noise_level, Some(40.0));
    }

    #[test]
    fn test_garbage_and_missing_become_sentinel() {
        let reading = normalize(&body(json!({
            "temperature": "banana",
            "humidity": null,
            "windSpeed": {"nested": true},
        })));

        assert_eq!(reading.temperature, None);
        assert_eq!(reading.humidity, None);
        assert_eq!(reading.wind_speed, None);
        assert_eq!(reading.noise_level, None);
    }

    #[test]
    fn test_client_timestamp_is_ignored() {
        let before = Utc::now();
        let reading = normalize(&body(json!({
            "temperature": 20,
            "timestamp": "1999-01-01T00:00:00Z",
        })));
        let after = Utc::now();

        let parsed = chrono::DateTime::parse_from_rfc3339(&reading.timestamp)
            .unwrap()
            .with_timezone(&Utc);
        assert!(parsed >= before && parsed <= after);
    }
}
