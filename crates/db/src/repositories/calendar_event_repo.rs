//! Scan queries over the `calendar_events` table.

use chrono::NaiveDate;
use peyk_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::calendar_event::UpcomingEvent;

/// Column list for `calendar_events` queries.
const COLUMNS: &str = "id, user_id, title, starts_at";

/// Read-only scan queries for the reminder and agenda scanners.
pub struct CalendarEventRepo;

impl CalendarEventRepo {
    /// Events starting in `[from, to)`.
    pub async fn list_starting_between(
        pool: &PgPool,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<UpcomingEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM calendar_events \
             WHERE starts_at >= $1 AND starts_at < $2 \
             ORDER BY user_id, starts_at"
        );
        sqlx::query_as::<_, UpcomingEvent>(&query)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// Events falling on a calendar day (UTC).
    pub async fn list_on_date(
        pool: &PgPool,
        date: NaiveDate,
    ) -> Result<Vec<UpcomingEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM calendar_events \
             WHERE starts_at::date = $1 \
             ORDER BY user_id, starts_at"
        );
        sqlx::query_as::<_, UpcomingEvent>(&query)
            .bind(date)
            .fetch_all(pool)
            .await
    }
}
