//! Notification preference entity models and DTOs.

use peyk_core::prefs::PreferenceFlags;
use peyk_core::types::{Timestamp, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `notification_preferences` table.
///
/// Each flag is nullable: `None` means the user never set it and the
/// category default applies (see `peyk_core::prefs`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationPreference {
    pub user_id: UserId,
    pub task_notifications: Option<bool>,
    pub project_notifications: Option<bool>,
    pub calendar_notifications: Option<bool>,
    pub financial_notifications: Option<bool>,
    pub updated_at: Timestamp,
}

impl NotificationPreference {
    /// Project the row into the pure policy type used by the filter.
    pub fn flags(&self) -> PreferenceFlags {
        PreferenceFlags {
            task: self.task_notifications,
            project: self.project_notifications,
            calendar: self.calendar_notifications,
            financial: self.financial_notifications,
        }
    }
}

/// DTO for a partial preference update. `None` fields are left untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePreferences {
    pub task_notifications: Option<bool>,
    pub project_notifications: Option<bool>,
    pub calendar_notifications: Option<bool>,
    pub financial_notifications: Option<bool>,
}
