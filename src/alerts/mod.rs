//! Threshold alerting.
//!
//! `rules` holds the pure per-reading evaluation; `notifier` delivers alert
//! summaries to the configured WhatsApp channel, best effort.

pub mod notifier;
pub mod rules;

pub use notifier::{Notifier, NotifierError};
pub use rules::{evaluate, should_notify, DEFAULT_NOTIFY_TEMP};
