//! Pure alert evaluation.
//!
//! Two independent rules run on every ingested reading:
//!
//! - [`evaluate`] maps a reading to human-readable condition strings using
//!   the per-metric band table (first matching band wins per metric).
//! - [`should_notify`] is the coarser send/no-send gate for outbound
//!   notifications, with its own configurable temperature cutoff.
//!
//! The two temperature cutoffs differ on purpose: the "very hot" band fires
//! at 38 while the notify gate defaults to 40. Do not unify them.

use crate::reading::NewReading;

/// Default notify-gate temperature cutoff in °C.
pub const DEFAULT_NOTIFY_TEMP: f64 = 40.0;

/// Evaluate a reading against the alert band table. A sentinel (`None`)
/// metric matches no band.
pub fn evaluate(reading: &NewReading) -> Vec<String> {
    let mut alerts = Vec::new();

    if let Some(t) = reading.temperature {
        if t >= 45.0 {
            alerts.push("EXTREME DANGER! Risk of heat stroke.".to_string());
        } else if t >= 38.0 {
            alerts.push("VERY HOT — Stay hydrated.".to_string());
        } else if t >= 30.0 {
            alerts.push("Warm — Monitor comfort.".to_string());
        } else if t < 10.0 {
            alerts.push("Very cold — Keep warm.".to_string());
        }
    }

    // Humidity bands are independent of each other and of temperature.
    if let Some(h) = reading.humidity {
        if h < 30.0 {
            alerts.push("Air too dry — use a humidifier.".to_string());
        }
        if h > 80.0 {
            alerts.push("High humidity — mold risk.".to_string());
        }
    }

    if let Some(w) = reading.wind_speed {
        if w > 80.0 {
            alerts.push("Extreme wind danger.".to_string());
        } else if w > 50.0 {
            alerts.push("High wind detected.".to_string());
        }
    }

    if let Some(n) = reading.noise_level {
        if n > 100.0 {
            alerts.push("Dangerous noise level.".to_string());
        } else if n > 80.0 {
            alerts.push("Loud noise — unsafe long exposure.".to_string());
        }
    }

    alerts
}

/// The send/no-send gate for outbound notifications. Coarser than the band
/// table and evaluated separately against the configured temperature cutoff.
pub fn should_notify(reading: &NewReading, temp_threshold: f64) -> bool {
    reading.temperature.is_some_and(|t| t >= temp_threshold)
        || reading.humidity.is_some_and(|h| h < 30.0 || h > 80.0)
        || reading.wind_speed.is_some_and(|w| w > 50.0)
        || reading.noise_level.is_some_and(|n| n > 80.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(
        temperature: f64,
        humidity: f64,
        wind_speed: f64,
        noise_level: f64,
    ) -> NewReading {
        NewReading {
            temperature: Some(temperature),
            humidity: Some(humidity),
            wind_speed: Some(wind_speed),
            noise_level: Some(noise_level),
            timestamp: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_extreme_heat_excludes_lower_bands() {
        let alerts = evaluate(&reading(46.0, 50.0, 10.0, 10.0));
        assert!(alerts.iter().any(|a| a.starts_with("EXTREME DANGER")));
        assert!(!alerts.iter().any(|a| a.starts_with("VERY HOT")));
        assert!(!alerts.iter().any(|a| a.starts_with("Warm")));
        assert_eq!(alerts.len(), 1);
    }

    #[test]
    fn test_temperature_band_boundaries() {
        assert!(evaluate(&reading(38.0, 50.0, 0.0, 0.0))
            .iter()
            .any(|a| a.starts_with("VERY HOT")));
        assert!(evaluate(&reading(30.0, 50.0, 0.0, 0.0))
            .iter()
            .any(|a| a.starts_with("Warm")));
        assert!(evaluate(&reading(9.9, 50.0, 0.0, 0.0))
            .iter()
            .any(|a| a.starts_with("Very cold")));
        assert!(evaluate(&reading(20.0, 50.0, 0.0, 0.0)).is_empty());
    }

    #[test]
    fn test_dry_air_without_temperature_alert() {
        let alerts = evaluate(&reading(20.0, 20.0, 10.0, 10.0));
        assert!(alerts.iter().any(|a| a.contains("too dry")));
        assert_eq!(alerts.len(), 1);
    }

    #[test]
    fn test_humidity_bands_are_independent_of_temperature() {
        let alerts = evaluate(&reading(46.0, 85.0, 0.0, 0.0));
        assert!(alerts.iter().any(|a| a.starts_with("EXTREME DANGER")));
        assert!(alerts.iter().any(|a| a.contains("mold risk")));
    }

    #[test]
    fn test_wind_and_noise_bands() {
        let alerts = evaluate(&reading(20.0, 50.0, 85.0, 105.0));
        assert!(alerts.iter().any(|a| a.contains("Extreme wind")));
        assert!(!alerts.iter().any(|a| a.contains("High wind")));
        assert!(alerts.iter().any(|a| a.contains("Dangerous noise")));
        assert!(!alerts.iter().any(|a| a.contains("Loud noise")));

        let alerts = evaluate(&reading(20.0, 50.0, 55.0, 85.0));
        assert!(alerts.iter().any(|a| a.contains("High wind")));
        assert!(alerts.iter().any(|a| a.contains("Loud noise")));
    }

    #[test]
    fn test_sentinel_metrics_match_no_band() {
        let silent = NewReading {
            temperature: None,
            humidity: None,
            wind_speed: None,
            noise_level: None,
            timestamp: "2026-01-01T00:00:00.000Z".to_string(),
        };
        assert!(evaluate(&silent).is_empty());
        assert!(!should_notify(&silent, DEFAULT_NOTIFY_TEMP));
    }

    #[test]
    fn test_notify_gate_temperature_cutoff() {
        assert!(should_notify(
            &reading(41.0, 50.0, 0.0, 0.0),
            DEFAULT_NOTIFY_TEMP
        ));
        assert!(!should_notify(
            &reading(39.0, 50.0, 0.0, 0.0),
            DEFAULT_NOTIFY_TEMP
        ));
        // The 38° band fires without crossing the 40° gate.
        assert!(!evaluate(&reading(39.0, 50.0, 0.0, 0.0)).is_empty());
    }

    #[test]
    fn test_notify_gate_other_metrics() {
        assert!(should_notify(&reading(20.0, 25.0, 0.0, 0.0), 40.0));
        assert!(should_notify(&reading(20.0, 85.0, 0.0, 0.0), 40.0));
        assert!(should_notify(&reading(20.0, 50.0, 55.0, 0.0), 40.0));
        assert!(should_notify(&reading(20.0, 50.0, 0.0, 85.0), 40.0));
        assert!(!should_notify(&reading(20.0, 50.0, 50.0, 80.0), 40.0));
    }

    #[test]
    fn test_configured_gate_overrides_default() {
        assert!(should_notify(&reading(36.0, 50.0, 0.0, 0.0), 35.0));
        assert!(!should_notify(&reading(44.0, 50.0, 0.0, 0.0), 45.0));
    }
}
