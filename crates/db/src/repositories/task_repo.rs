//! Scan queries over the `tasks` table.

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::models::task::DueTask;

/// Column list for `tasks` queries.
const COLUMNS: &str = "id, title, assignee_id, due_date, status, created_at";

/// Task statuses that no longer warrant reminders.
const CLOSED_STATUSES: [&str; 2] = ["done", "cancelled"];

/// Read-only scan queries for the deadline scanners.
pub struct TaskRepo;

impl TaskRepo {
    /// Open, assigned tasks with a due date in `[from, to]` inclusive.
    pub async fn list_due_between(
        pool: &PgPool,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DueTask>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks \
             WHERE assignee_id IS NOT NULL \
               AND due_date BETWEEN $1 AND $2 \
               AND status <> ALL($3) \
             ORDER BY assignee_id, due_date"
        );
        sqlx::query_as::<_, DueTask>(&query)
            .bind(from)
            .bind(to)
            .bind(&CLOSED_STATUSES[..])
            .fetch_all(pool)
            .await
    }

    /// Open, assigned tasks whose due date has passed.
    pub async fn list_overdue(pool: &PgPool, today: NaiveDate) -> Result<Vec<DueTask>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks \
             WHERE assignee_id IS NOT NULL \
               AND due_date < $1 \
               AND status <> ALL($2) \
             ORDER BY assignee_id, due_date"
        );
        sqlx::query_as::<_, DueTask>(&query)
            .bind(today)
            .bind(&CLOSED_STATUSES[..])
            .fetch_all(pool)
            .await
    }
}
