//! Notification messages and the wire payload contract.
//!
//! [`NotificationMessage`] is the ephemeral unit an event source hands to
//! the dispatcher. [`WirePayload`] is the JSON shape that — after
//! encryption — reaches the browser service worker. The service worker is
//! an independently deployed collaborator, so the defaulting rules for its
//! optional fields (`icon`, `url`) are part of the contract and live here.

use serde::{Deserialize, Serialize};

use crate::category::NotificationCategory;
use crate::types::Timestamp;

/// Icon shown when a message carries none.
pub const DEFAULT_ICON: &str = "/icons/icon-192.png";

/// Deep link opened on click when a message carries none.
pub const DEFAULT_URL: &str = "/";

/// An ephemeral notification, fanned out to every push subscription of
/// every recipient that passes the preference filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationMessage {
    /// OS notification headline.
    pub title: String,
    /// Notification detail text.
    pub body: String,
    /// Deep link opened on click. `None` means [`DEFAULT_URL`].
    pub url: Option<String>,
    /// Icon URL. `None` means [`DEFAULT_ICON`].
    pub icon: Option<String>,
    /// Drives preference filtering; `general` is never filtered.
    pub category: NotificationCategory,
}

impl NotificationMessage {
    /// Build a message with only the required fields.
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        category: NotificationCategory,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            url: None,
            icon: None,
            category,
        }
    }

    /// Set the deep link.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the icon.
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// The JSON payload delivered (encrypted) to the push service.
    pub fn wire_payload(&self, now: Timestamp) -> WirePayload {
        WirePayload {
            title: self.title.clone(),
            body: self.body.clone(),
            icon: self.icon.clone(),
            url: self.url.clone(),
            timestamp: Some(now.to_rfc3339()),
        }
    }
}

/// The JSON shape the service worker decodes.
///
/// Optional fields are omitted on the wire when absent; the receiver
/// substitutes [`DEFAULT_ICON`] and [`DEFAULT_URL`]. Those substitutions
/// are mirrored here by [`icon_or_default`](WirePayload::icon_or_default)
/// and [`url_or_default`](WirePayload::url_or_default) so both sides of
/// the contract are testable from this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WirePayload {
    pub title: String,
    pub body: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// RFC 3339 creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl WirePayload {
    /// Icon to display, with the receiver-side default applied.
    pub fn icon_or_default(&self) -> &str {
        self.icon.as_deref().unwrap_or(DEFAULT_ICON)
    }

    /// Click target, with the receiver-side default applied.
    pub fn url_or_default(&self) -> &str {
        self.url.as_deref().unwrap_or(DEFAULT_URL)
    }
}
