//! Task rows as seen by the deadline scanners.

use chrono::NaiveDate;
use peyk_core::types::{Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A task with an assignee and a due date, read-only from the scanners'
/// point of view.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DueTask {
    pub id: Uuid,
    pub title: String,
    pub assignee_id: Option<UserId>,
    pub due_date: Option<NaiveDate>,
    pub status: String,
    pub created_at: Timestamp,
}
