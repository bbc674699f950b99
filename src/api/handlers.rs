use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::alerts::{rules, Notifier};
use crate::ingest;
use crate::mirror::MirrorSink;
use crate::openweather;
use crate::query;
use crate::reading::Reading;
use crate::store::ReadingStore;

/// Application state shared across handlers. Constructed once at startup;
/// tests swap in an in-memory store and doubles for the sinks.
pub struct AppState {
    pub store: Arc<ReadingStore>,
    pub mirror: Arc<dyn MirrorSink>,
    pub notifier: Arc<Notifier>,
    pub http: reqwest::Client,
    pub alert_temp: f64,
    pub openweather_api_key: Option<String>,
}

// ============================================================================
// Health Check
// ============================================================================

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ============================================================================
// Ingest
// ============================================================================

/// `POST /api/weather`: the sensor ingest path.
///
/// Normalize, append, acknowledge. Mirroring and alert notification run on
/// spawned tasks after the append succeeds and never delay or fail the
/// response; a malformed body is rejected by the `Json` extractor before any
/// store mutation.
pub async fn ingest_weather(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Map<String, Value>>,
) -> Result<Json<Value>, ApiError> {
    let reading = ingest::normalize(&body);
    tracing::info!(
        temperature = ?reading.temperature,
        humidity = ?reading.humidity,
        wind_speed = ?reading.wind_speed,
        noise_level = ?reading.noise_level,
        "received reading"
    );

    let id = state
        .store
        .append(&reading)
        .map_err(|e| ApiError::Ingest(e.to_string()))?;

    if state.mirror.is_enabled() {
        let mirror = Arc::clone(&state.mirror);
        let stored = reading.clone().into_reading(id);
        tokio::spawn(async move {
            if let Err(e) = mirror.mirror(&stored).await {
                tracing::warn!(id = stored.id, error = %e, "mirror write failed");
            }
        });
    }

    if rules::should_notify(&reading, state.alert_temp) && state.notifier.is_configured() {
        let alerts = rules::evaluate(&reading);
        if !alerts.is_empty() {
            let notifier = Arc::clone(&state.notifier);
            tokio::spawn(async move {
                if let Err(e) = notifier.notify(&reading, &alerts).await {
                    tracing::warn!(error = %e, "alert notification failed");
                }
            });
        }
    }

    Ok(Json(json!({ "success": true })))
}

// ============================================================================
// Readings
// ============================================================================

pub async fn latest_reading(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let reading = state.store.latest().map_err(|e| {
        tracing::error!(error = %e, "latest-reading query failed");
        ApiError::Internal("database error".to_string())
    })?;

    match reading {
        Some(reading) => {
            let value =
                serde_json::to_value(reading).map_err(|e| ApiError::Internal(e.to_string()))?;
            Ok(Json(value))
        }
        None => Ok(Json(json!({}))),
    }
}

#[derive(Deserialize)]
pub struct RangeParams {
    pub range: Option<String>,
}

/// `GET /api/readings?range=`: rows oldest first, bounded by the range
/// token. On a read error the dashboard still gets an array, just an empty
/// one with a server-error status.
pub async fn list_readings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RangeParams>,
) -> impl IntoResponse {
    let token = params.range.as_deref().unwrap_or("24h");

    match query::recent(&state.store, token) {
        Ok(rows) => (StatusCode::OK, Json(rows)),
        Err(e) => {
            tracing::error!(error = %e, token, "range query failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(Vec::<Reading>::new()))
        }
    }
}

pub async fn debug_count(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let count = state
        .store
        .count()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(json!({ "count": count })))
}

// ============================================================================
// Global Weather Proxy
// ============================================================================

#[derive(Deserialize)]
pub struct OpenWeatherParams {
    pub city: Option<String>,
    pub country: Option<String>,
}

pub async fn openweather_lookup(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OpenWeatherParams>,
) -> Result<Json<Value>, ApiError> {
    let city = params
        .city
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::BadRequest("city and country required".to_string()))?;
    let country = params
        .country
        .filter(|c| !c.is_empty())
        .ok_or_else(|| ApiError::BadRequest("city and country required".to_string()))?;
    let api_key = state
        .openweather_api_key
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("OpenWeather API key not configured".to_string()))?;

    let result = openweather::lookup(&state.http, api_key, &city, &country)
        .await
        .map_err(|e| ApiError::Internal(format!("OpenWeather error: {e}")))?;

    Ok(Json(result))
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    /// Ingest failures use the sensor protocol's `{success, error}` shape.
    Ingest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
            ApiError::Ingest(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": msg })),
            )
                .into_response(),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": msg })),
            )
                .into_response(),
        }
    }
}
