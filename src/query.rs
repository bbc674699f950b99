//! Range-token query service.
//!
//! The dashboard selects history with a short range token; each token maps to
//! a fixed row limit at the one-reading-per-minute cadence. Unknown tokens
//! fall back to the 24h default instead of erroring.

use crate::reading::Reading;
use crate::store::{ReadingStore, StoreError};

/// Default row limit, equivalent to the `24h` token.
pub const DEFAULT_LIMIT: usize = 1440;

/// Map a range token to a row limit.
pub fn range_limit(token: &str) -> usize {
    match token {
        "1h" => 60,
        "6h" => 360,
        "12h" => 720,
        "7d" => 10080,
        _ => DEFAULT_LIMIT,
    }
}

/// The most recent readings for a range token, oldest first. An empty result
/// is valid and distinct from an error.
pub fn recent(store: &ReadingStore, token: &str) -> Result<Vec<Reading>, StoreError> {
    store.query_range(range_limit(token))
}
