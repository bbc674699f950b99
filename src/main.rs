//! stratus Server
//!
//! Run with: cargo run
//!
//! Environment variables:
//! - STRATUS_HOST: Bind address (default: 0.0.0.0)
//! - STRATUS_PORT: Port number (default: 3000)
//! - STRATUS_DB_PATH: SQLite database path (default: ./weather.db)
//! - STRATUS_ALERT_TEMP: Notify-gate temperature cutoff in °C (default: 40)
//! - STRATUS_CALLMEBOT_PHONE / STRATUS_CALLMEBOT_API_KEY: WhatsApp alerting
//!   credentials (alerting disabled when either is missing)
//! - STRATUS_MIRROR_URL: secondary-store REST endpoint (mirroring disabled
//!   when missing); STRATUS_MIRROR_AUTH: optional auth token
//! - STRATUS_OPENWEATHER_API_KEY: key for the global-weather proxy
//! - RUST_LOG: Log level (default: info)

use std::path::PathBuf;

use stratus::api::{run_server, ServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stratus=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse configuration from environment
    let host = env_opt("STRATUS_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
    let port: u16 = env_opt("STRATUS_PORT")
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let db_path = env_opt("STRATUS_DB_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./weather.db"));
    let alert_temp: f64 = env_opt("STRATUS_ALERT_TEMP")
        .and_then(|t| t.parse().ok())
        .unwrap_or(stratus::alerts::DEFAULT_NOTIFY_TEMP);

    let config = ServerConfig {
        host,
        port,
        db_path,
        alert_temp,
        callmebot_phone: env_opt("STRATUS_CALLMEBOT_PHONE"),
        callmebot_api_key: env_opt("STRATUS_CALLMEBOT_API_KEY"),
        mirror_url: env_opt("STRATUS_MIRROR_URL"),
        mirror_auth: env_opt("STRATUS_MIRROR_AUTH"),
        openweather_api_key: env_opt("STRATUS_OPENWEATHER_API_KEY"),
    };

    tracing::info!("stratus configuration:");
    tracing::info!("  Host: {}:{}", config.host, config.port);
    tracing::info!("  Database: {}", config.db_path.display());
    tracing::info!("  Notify gate: {}°C", config.alert_temp);
    tracing::info!(
        "  WhatsApp alerting: {}",
        if config.callmebot_phone.is_some() && config.callmebot_api_key.is_some() {
            "configured"
        } else {
            "disabled"
        }
    );
    tracing::info!(
        "  Mirror sink: {}",
        config.mirror_url.as_deref().unwrap_or("disabled")
    );
    tracing::info!(
        "  OpenWeather proxy: {}",
        if config.openweather_api_key.is_some() {
            "configured"
        } else {
            "disabled"
        }
    );

    println!(
        r#"
      _             _
  ___| |_ _ __ __ _| |_ _   _ ___
 / __| __| '__/ _` | __| | | / __|
 \__ \ |_| | | (_| | |_| |_| \__ \
 |___/\__|_|  \__,_|\__|\__,_|___/

 Weather-Station Telemetry Service
 Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );

    run_server(config).await
}
