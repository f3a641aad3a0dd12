//! Repository for the `notification_preferences` table.

use peyk_core::types::UserId;
use sqlx::PgPool;

use crate::models::notification_preference::{NotificationPreference, UpdatePreferences};

/// Column list for `notification_preferences` queries.
const COLUMNS: &str = "user_id, task_notifications, project_notifications, \
    calendar_notifications, financial_notifications, updated_at";

/// Provides lookup and upsert operations for notification preferences.
pub struct NotificationPreferenceRepo;

impl NotificationPreferenceRepo {
    /// Fetch a user's preference row, if any.
    ///
    /// A missing row is a valid state (all category defaults apply), so
    /// this returns `Ok(None)` rather than an error.
    pub async fn get(
        pool: &PgPool,
        user_id: UserId,
    ) -> Result<Option<NotificationPreference>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notification_preferences WHERE user_id = $1");
        sqlx::query_as::<_, NotificationPreference>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert or partially update a user's preference row.
    ///
    /// Uses `COALESCE` so only the flags present in the input overwrite
    /// stored values; creation is idempotent via `ON CONFLICT (user_id)`.
    pub async fn upsert(
        pool: &PgPool,
        user_id: UserId,
        update: &UpdatePreferences,
    ) -> Result<NotificationPreference, sqlx::Error> {
        let query = format!(
            "INSERT INTO notification_preferences \
                (user_id, task_notifications, project_notifications, \
                 calendar_notifications, financial_notifications) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (user_id) DO UPDATE SET \
                task_notifications = COALESCE($2, notification_preferences.task_notifications), \
                project_notifications = COALESCE($3, notification_preferences.project_notifications), \
                calendar_notifications = COALESCE($4, notification_preferences.calendar_notifications), \
                financial_notifications = COALESCE($5, notification_preferences.financial_notifications), \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, NotificationPreference>(&query)
            .bind(user_id)
            .bind(update.task_notifications)
            .bind(update.project_notifications)
            .bind(update.calendar_notifications)
            .bind(update.financial_notifications)
            .fetch_one(pool)
            .await
    }
}
