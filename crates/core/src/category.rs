//! Notification categories.
//!
//! A category classifies what domain a notification belongs to and is used
//! solely to gate delivery against the recipient's stored preferences.

use serde::{Deserialize, Serialize};

/// The closed set of notification domains.
///
/// `General` is special: it bypasses preference filtering entirely and is
/// never persisted as a preference flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    Task,
    Project,
    Calendar,
    Financial,
    General,
}

impl NotificationCategory {
    /// Stable lowercase name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationCategory::Task => "task",
            NotificationCategory::Project => "project",
            NotificationCategory::Calendar => "calendar",
            NotificationCategory::Financial => "financial",
            NotificationCategory::General => "general",
        }
    }
}

impl std::fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
