//! Task-due scanner: tasks due today or tomorrow, one message per assignee.

use chrono::{Duration, NaiveDate, Utc};
use peyk_core::{NotificationCategory, NotificationMessage};
use peyk_db::models::DueTask;
use peyk_db::repositories::TaskRepo;
use peyk_db::DbPool;
use peyk_push::Dispatcher;

use crate::grouping::{by_assignee, title_preview};
use crate::{ScanError, ScanSummary};

/// Scan for tasks due today or tomorrow and notify each assignee.
pub async fn run(pool: &DbPool, dispatcher: &Dispatcher) -> Result<ScanSummary, ScanError> {
    let today = Utc::now().date_naive();
    let tasks = TaskRepo::list_due_between(pool, today, today + Duration::days(1)).await?;

    let mut summary = ScanSummary::default();
    for (assignee, tasks) in by_assignee(tasks) {
        let message = message_for(&tasks, today);
        match dispatcher.dispatch(&message, &[assignee]).await {
            Ok(report) => summary.absorb(&report),
            Err(e) => {
                tracing::error!(user_id = %assignee, error = %e, "Task-due dispatch failed");
            }
        }
    }

    tracing::info!(
        messages = summary.messages,
        sent = summary.sent,
        "Task-due scan complete"
    );
    Ok(summary)
}

/// Build the per-assignee message. Pure so the wording is testable.
fn message_for(tasks: &[DueTask], today: NaiveDate) -> NotificationMessage {
    let due_today = tasks.iter().filter(|t| t.due_date == Some(today)).count();

    let body = if tasks.len() == 1 {
        let when = if due_today == 1 { "today" } else { "tomorrow" };
        format!("\"{}\" is due {when}.", tasks[0].title)
    } else {
        format!(
            "{} tasks are due soon ({due_today} today): {}",
            tasks.len(),
            title_preview(tasks.iter().map(|t| t.title.as_str()), 3)
        )
    };

    NotificationMessage::new("Tasks due soon", body, NotificationCategory::Task)
        .with_url("/dashboard/tasks")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use uuid::Uuid;

    fn task(title: &str, due: NaiveDate) -> DueTask {
        DueTask {
            id: Uuid::new_v4(),
            title: title.into(),
            assignee_id: Some(Uuid::new_v4()),
            due_date: Some(due),
            status: "open".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn single_task_due_today() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let msg = message_for(&[task("Write report", today)], today);
        assert_eq!(msg.body, "\"Write report\" is due today.");
        assert_eq!(msg.category, NotificationCategory::Task);
        assert_eq!(msg.url.as_deref(), Some("/dashboard/tasks"));
    }

    #[test]
    fn single_task_due_tomorrow() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let msg = message_for(&[task("Write report", today + Duration::days(1))], today);
        assert_eq!(msg.body, "\"Write report\" is due tomorrow.");
    }

    #[test]
    fn multiple_tasks_are_summarized() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let tasks = vec![
            task("a", today),
            task("b", today + Duration::days(1)),
            task("c", today),
        ];
        let msg = message_for(&tasks, today);
        assert_eq!(msg.body, "3 tasks are due soon (2 today): a, b, c");
    }
}
