//! Daily agenda composer: one morning summary per user of today's events
//! and tasks. Users with an empty agenda get nothing.

use std::collections::BTreeMap;

use chrono::Utc;
use peyk_core::types::UserId;
use peyk_core::{NotificationCategory, NotificationMessage};
use peyk_db::repositories::{CalendarEventRepo, TaskRepo};
use peyk_db::DbPool;
use peyk_push::Dispatcher;

use crate::{ScanError, ScanSummary};

/// Per-user agenda item counts for one day.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Agenda {
    events: usize,
    tasks: usize,
}

impl Agenda {
    fn is_empty(&self) -> bool {
        self.events == 0 && self.tasks == 0
    }
}

/// Compose and send today's agenda to every user with at least one item.
pub async fn run(pool: &DbPool, dispatcher: &Dispatcher) -> Result<ScanSummary, ScanError> {
    let today = Utc::now().date_naive();
    let events = CalendarEventRepo::list_on_date(pool, today).await?;
    let tasks = TaskRepo::list_due_between(pool, today, today).await?;

    let mut agendas: BTreeMap<UserId, Agenda> = BTreeMap::new();
    for event in &events {
        agendas.entry(event.user_id).or_default().events += 1;
    }
    for task in &tasks {
        if let Some(assignee) = task.assignee_id {
            agendas.entry(assignee).or_default().tasks += 1;
        }
    }

    let mut summary = ScanSummary::default();
    for (user_id, agenda) in agendas {
        if agenda.is_empty() {
            continue;
        }
        let message = message_for(agenda);
        match dispatcher.dispatch(&message, &[user_id]).await {
            Ok(report) => summary.absorb(&report),
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Agenda dispatch failed");
            }
        }
    }

    tracing::info!(
        messages = summary.messages,
        sent = summary.sent,
        "Daily agenda scan complete"
    );
    Ok(summary)
}

fn message_for(agenda: Agenda) -> NotificationMessage {
    let body = match (agenda.events, agenda.tasks) {
        (e, 0) => format!("You have {e} {} today.", plural(e, "event")),
        (0, t) => format!("You have {t} {} due today.", plural(t, "task")),
        (e, t) => format!(
            "You have {e} {} and {t} {} due today.",
            plural(e, "event"),
            plural(t, "task")
        ),
    };

    NotificationMessage::new("Today's agenda", body, NotificationCategory::Calendar)
        .with_url("/dashboard")
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        noun.to_string()
    } else {
        format!("{noun}s")
    }
}
