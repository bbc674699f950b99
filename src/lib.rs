//! stratus: Weather-Station Telemetry Service
//!
//! Ingests periodic environmental readings (temperature, humidity, wind
//! speed, noise level) from an embedded sensor over HTTP, persists them in a
//! durable append-only SQLite log, and serves them for live display and
//! historical charting. Readings that cross the alert thresholds trigger a
//! best-effort WhatsApp notification, and each reading can optionally be
//! mirrored to a secondary REST store.
//!
//! # Pipeline
//!
//! inbound payload -> normalize -> append -> (spawned) mirror + alert/notify
//!
//! The mirror and notification legs run after the ingest response and their
//! failures are logged and discarded; the sensor never waits on them.
//!
//! # Example
//!
//! ```no_run
//! use stratus::ingest;
//! use stratus::store::ReadingStore;
//!
//! let store = ReadingStore::open("./weather.db").unwrap();
//!
//! let body = serde_json::json!({ "temperature": 21.5, "humidity": 48 });
//! let reading = ingest::normalize(body.as_object().unwrap());
//! let id = store.append(&reading).unwrap();
//! println!("stored reading {id}");
//! ```

pub mod alerts;
pub mod api;
pub mod ingest;
pub mod mirror;
pub mod openweather;
pub mod query;
pub mod reading;
pub mod store;

// Re-export commonly used types
pub use reading::{NewReading, Reading};
pub use store::{ReadingStore, StoreError};
