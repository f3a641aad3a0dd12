//! Overdue scanner: open tasks past their due date, per assignee.

use chrono::Utc;
use peyk_core::{NotificationCategory, NotificationMessage};
use peyk_db::models::DueTask;
use peyk_db::repositories::TaskRepo;
use peyk_db::DbPool;
use peyk_push::Dispatcher;

use crate::grouping::{by_assignee, title_preview};
use crate::{ScanError, ScanSummary};

/// Scan for overdue tasks and nudge each assignee.
pub async fn run(pool: &DbPool, dispatcher: &Dispatcher) -> Result<ScanSummary, ScanError> {
    let today = Utc::now().date_naive();
    let tasks = TaskRepo::list_overdue(pool, today).await?;

    let mut summary = ScanSummary::default();
    for (assignee, tasks) in by_assignee(tasks) {
        let message = message_for(&tasks);
        match dispatcher.dispatch(&message, &[assignee]).await {
            Ok(report) => summary.absorb(&report),
            Err(e) => {
                tracing::error!(user_id = %assignee, error = %e, "Overdue dispatch failed");
            }
        }
    }

    tracing::info!(
        messages = summary.messages,
        sent = summary.sent,
        "Overdue scan complete"
    );
    Ok(summary)
}

fn message_for(tasks: &[DueTask]) -> NotificationMessage {
    let body = if tasks.len() == 1 {
        format!("\"{}\" is past its due date.", tasks[0].title)
    } else {
        format!(
            "{} tasks are past due: {}",
            tasks.len(),
            title_preview(tasks.iter().map(|t| t.title.as_str()), 3)
        )
    };

    NotificationMessage::new("Overdue tasks", body, NotificationCategory::Task)
        .with_url("/dashboard/tasks?filter=overdue")
}
