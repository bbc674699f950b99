//! Optional mirroring of readings to a secondary store.
//!
//! The sink is selected once at startup: an HTTP mirror when a target URL is
//! configured, otherwise a no-op. Mirror writes run on a spawned task after
//! the primary append has been acknowledged; failures are logged and
//! discarded and can never affect the ingest response.

use std::time::Duration;

use futures::future::{self, BoxFuture, FutureExt};

use crate::reading::Reading;

const MIRROR_TIMEOUT: Duration = Duration::from_secs(10);

/// A best-effort secondary persistence target.
pub trait MirrorSink: Send + Sync {
    /// Duplicate one reading into the secondary store.
    fn mirror(&self, reading: &Reading) -> BoxFuture<'static, Result<(), MirrorError>>;

    /// Whether a real sink is configured. Lets the ingest path skip spawning
    /// a task for the no-op case.
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Sink used when no mirror is configured.
pub struct NoopSink;

impl MirrorSink for NoopSink {
    fn mirror(&self, _reading: &Reading) -> BoxFuture<'static, Result<(), MirrorError>> {
        future::ready(Ok(())).boxed()
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Pushes each reading as JSON to a REST endpoint, e.g. a Firebase Realtime
/// Database `.json` collection URL. An optional auth token is passed as the
/// `auth` query parameter.
pub struct HttpMirror {
    client: reqwest::Client,
    url: String,
    auth: Option<String>,
}

impl HttpMirror {
    pub fn new(url: impl Into<String>, auth: Option<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(MIRROR_TIMEOUT)
                .build()
                .unwrap_or_default(),
            url: url.into(),
            auth,
        }
    }
}

impl MirrorSink for HttpMirror {
    fn mirror(&self, reading: &Reading) -> BoxFuture<'static, Result<(), MirrorError>> {
        let client = self.client.clone();
        let url = self.url.clone();
        let auth = self.auth.clone();
        let reading = reading.clone();

        async move {
            let mut request = client.post(&url).json(&reading);
            if let Some(auth) = &auth {
                request = request.query(&[("auth", auth.as_str())]);
            }

            let response = request
                .send()
                .await
                .map_err(|e| MirrorError::Send(e.to_string()))?;

            if !response.status().is_success() {
                return Err(MirrorError::Status(response.status().as_u16()));
            }

            tracing::debug!(id = reading.id, "reading mirrored");
            Ok(())
        }
        .boxed()
    }
}

/// Mirror errors. Logged by the caller, never propagated.
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    #[error("failed to reach mirror store: {0}")]
    Send(String),

    #[error("mirror store returned status {0}")]
    Status(u16),
}
