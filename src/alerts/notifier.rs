//! Outbound alert delivery via the CallMeBot WhatsApp API.
//!
//! Delivery is best effort and fire-and-forget: the caller spawns `notify`
//! after the ingest response is on its way, logs any error, and never
//! retries. An unconfigured notifier (missing phone or API key) skips
//! silently so the rest of the pipeline needs no special casing.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::reading::NewReading;

const CALLMEBOT_URL: &str = "https://api.callmebot.com/whatsapp.php";
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// WhatsApp alert notifier.
pub struct Notifier {
    client: reqwest::Client,
    endpoint: String,
    phone: Option<String>,
    api_key: Option<String>,
}

impl Notifier {
    pub fn new(phone: Option<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(SEND_TIMEOUT)
                .build()
                .unwrap_or_default(),
            endpoint: CALLMEBOT_URL.to_string(),
            phone,
            api_key,
        }
    }

    /// Override the delivery endpoint. Used by tests.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.phone.is_some() && self.api_key.is_some()
    }

    /// Send the formatted alert summary. A no-op when unconfigured or when
    /// the alert set is empty.
    pub async fn notify(
        &self,
        reading: &NewReading,
        alerts: &[String],
    ) -> Result<(), NotifierError> {
        let (phone, api_key) = match (&self.phone, &self.api_key) {
            (Some(phone), Some(api_key)) => (phone, api_key),
            _ => return Ok(()),
        };

        if alerts.is_empty() {
            return Ok(());
        }

        let message = format_message(reading, alerts);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("phone", phone.as_str()),
                ("text", message.as_str()),
                ("apikey", api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| NotifierError::Send(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifierError::Status(response.status().as_u16()));
        }

        tracing::debug!("WhatsApp alert sent");
        Ok(())
    }
}

fn fmt_metric(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}"),
        None => "n/a".to_string(),
    }
}

fn format_message(reading: &NewReading, alerts: &[String]) -> String {
    let time = DateTime::parse_from_rfc3339(&reading.timestamp)
        .map(|t| {
            t.with_timezone(&Utc)
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string()
        })
        .unwrap_or_else(|_| reading.timestamp.clone());

    let alert_lines: Vec<String> = alerts.iter().map(|a| format!("- {a}")).collect();

    format!(
        "Weather Station Alert\n\n\
         Temp: {}°C\n\
         Humidity: {}%\n\
         Wind: {} km/h\n\
         Noise: {} dB\n\n\
         Alerts:\n{}\n\n\
         Time: {}",
        fmt_metric(reading.temperature),
        fmt_metric(reading.humidity),
        fmt_metric(reading.wind_speed),
        fmt_metric(reading.noise_level),
        alert_lines.join("\n"),
        time,
    )
}

/// Notifier errors. Logged by the caller, never propagated to the ingest
/// response.
#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("failed to send notification: {0}")]
    Send(String),

    #[error("notification endpoint returned status {0}")]
    Status(u16),
}
