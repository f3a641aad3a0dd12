//! Project rows as seen by the deadline scanner.

use chrono::NaiveDate;
use peyk_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// An active project approaching its end date.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeadlineProject {
    pub id: Uuid,
    pub name: String,
    pub end_date: Option<NaiveDate>,
    pub status: String,
    pub created_at: Timestamp,
}
