//! Calendar event rows as seen by the reminder and agenda scanners.

use peyk_core::types::{Timestamp, UserId};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// An event owned by a single user.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UpcomingEvent {
    pub id: Uuid,
    pub user_id: UserId,
    pub title: String,
    pub starts_at: Timestamp,
}
