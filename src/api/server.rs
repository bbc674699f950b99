use axum::{
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    debug_count, health_check, ingest_weather, latest_reading, list_readings, openweather_lookup,
    AppState,
};
use crate::alerts::{Notifier, DEFAULT_NOTIFY_TEMP};
use crate::mirror::{HttpMirror, MirrorSink, NoopSink};
use crate::store::ReadingStore;

// Embed the dashboard at compile time
const INDEX_HTML: &str = include_str!("../ui/index.html");
const APP_JS: &str = include_str!("../ui/app.js");

/// Timeout for outbound proxy calls.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub alert_temp: f64,
    pub callmebot_phone: Option<String>,
    pub callmebot_api_key: Option<String>,
    pub mirror_url: Option<String>,
    pub mirror_auth: Option<String>,
    pub openweather_api_key: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            db_path: PathBuf::from("./weather.db"),
            alert_temp: DEFAULT_NOTIFY_TEMP,
            callmebot_phone: None,
            callmebot_api_key: None,
            mirror_url: None,
            mirror_auth: None,
            openweather_api_key: None,
        }
    }
}

// Dashboard handlers
async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/javascript")],
        APP_JS,
    )
        .into_response()
}

/// Build the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Dashboard
        .route("/", get(serve_index))
        .route("/ui/app.js", get(serve_app_js))
        // Health check
        .route("/health", get(health_check))
        // Telemetry
        .route("/api/weather", post(ingest_weather))
        .route("/api/readings/latest", get(latest_reading))
        .route("/api/readings", get(list_readings))
        .route("/api/debug/count", get(debug_count))
        // Global weather proxy
        .route("/api/openweather", get(openweather_lookup))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Run the HTTP server
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Open the reading store
    let store = Arc::new(ReadingStore::open(&config.db_path)?);
    tracing::info!("Reading store ready at {}", config.db_path.display());

    // Select the mirror sink once at startup
    let mirror: Arc<dyn MirrorSink> = match &config.mirror_url {
        Some(url) => {
            tracing::info!("Mirror sink enabled: {}", url);
            Arc::new(HttpMirror::new(url.clone(), config.mirror_auth.clone()))
        }
        None => {
            tracing::info!("Mirror sink disabled (no mirror URL configured)");
            Arc::new(NoopSink)
        }
    };

    let notifier = Arc::new(Notifier::new(
        config.callmebot_phone.clone(),
        config.callmebot_api_key.clone(),
    ));
    if notifier.is_configured() {
        tracing::info!("WhatsApp alerting enabled");
    } else {
        tracing::info!("WhatsApp alerting disabled (phone or API key missing)");
    }

    let state = Arc::new(AppState {
        store,
        mirror,
        notifier,
        http: reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?,
        alert_temp: config.alert_temp,
        openweather_api_key: config.openweather_api_key.clone(),
    });

    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    tracing::info!("Starting stratus server on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("stratus server stopped");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C signal handler");

    tracing::info!("Shutdown signal received");
}
