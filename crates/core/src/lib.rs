//! Peyk shared types and policy.
//!
//! This crate has zero internal deps so it can be used by the repository
//! layer, the push delivery core, the scanners, and any future CLI tooling.
//!
//! - [`category::NotificationCategory`] — the closed set of notification
//!   domains that gate delivery against user preferences.
//! - [`prefs`] — the preference filter: the single place where the
//!   per-category opt-out defaults live.
//! - [`message`] — the ephemeral notification message and the wire payload
//!   the browser service worker decodes.

pub mod category;
pub mod message;
pub mod prefs;
pub mod types;

pub use category::NotificationCategory;
pub use message::{NotificationMessage, WirePayload};
pub use prefs::{should_notify, PreferenceFlags};
