//! OpenWeatherMap lookup client for the global-weather proxy endpoint.
//!
//! Unlike the mirror and notifier paths, errors here are the user-visible
//! result: the proxy endpoint exists only to make this call.

use serde_json::{json, Value};

const CURRENT_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

/// Fetch current conditions and the forecast for a city, concurrently, and
/// return them as a single `{current, forecast}` object.
pub async fn lookup(
    client: &reqwest::Client,
    api_key: &str,
    city: &str,
    country: &str,
) -> Result<Value, LookupError> {
    let query = format!("{city},{country}");

    let (current, forecast) = tokio::try_join!(
        fetch(client, CURRENT_URL, &query, api_key),
        fetch(client, FORECAST_URL, &query, api_key),
    )?;

    Ok(json!({ "current": current, "forecast": forecast }))
}

async fn fetch(
    client: &reqwest::Client,
    base: &str,
    query: &str,
    api_key: &str,
) -> Result<Value, LookupError> {
    let response = client
        .get(base)
        .query(&[("q", query), ("units", "metric"), ("appid", api_key)])
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(LookupError::Upstream(response.status().as_u16()));
    }

    Ok(response.json().await?)
}

/// Weather-lookup errors.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("OpenWeather request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenWeather returned status {0}")]
    Upstream(u16),
}
