//! Scan queries over the `projects` and `project_members` tables.

use chrono::NaiveDate;
use peyk_core::types::UserId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::project::DeadlineProject;

/// Column list for `projects` queries.
const COLUMNS: &str = "id, name, end_date, status, created_at";

/// Read-only scan queries for the project deadline scanner.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Active projects whose end date falls on any of the given days.
    pub async fn list_ending_on(
        pool: &PgPool,
        dates: &[NaiveDate],
    ) -> Result<Vec<DeadlineProject>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects \
             WHERE status = 'active' \
               AND end_date = ANY($1) \
             ORDER BY end_date, name"
        );
        sqlx::query_as::<_, DeadlineProject>(&query)
            .bind(dates)
            .fetch_all(pool)
            .await
    }

    /// User ids of everyone on the project.
    pub async fn member_ids(pool: &PgPool, project_id: Uuid) -> Result<Vec<UserId>, sqlx::Error> {
        sqlx::query_scalar("SELECT user_id FROM project_members WHERE project_id = $1")
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
