//! Project deadline scanner: projects ending in exactly 1 or 3 days,
//! delivered to every project member.

use chrono::{Duration, NaiveDate, Utc};
use peyk_core::{NotificationCategory, NotificationMessage};
use peyk_db::models::DeadlineProject;
use peyk_db::repositories::ProjectRepo;
use peyk_db::DbPool;
use peyk_push::Dispatcher;

use crate::{ScanError, ScanSummary};

/// How many days ahead a warning goes out.
const WARNING_DAYS: [i64; 2] = [1, 3];

/// Scan for approaching project deadlines and notify the members.
pub async fn run(pool: &DbPool, dispatcher: &Dispatcher) -> Result<ScanSummary, ScanError> {
    let today = Utc::now().date_naive();
    let dates: Vec<NaiveDate> = WARNING_DAYS
        .iter()
        .map(|d| today + Duration::days(*d))
        .collect();
    let projects = ProjectRepo::list_ending_on(pool, &dates).await?;

    let mut summary = ScanSummary::default();
    for project in &projects {
        let members = ProjectRepo::member_ids(pool, project.id).await?;
        if members.is_empty() {
            continue;
        }
        let message = message_for(project, today);
        match dispatcher.dispatch(&message, &members).await {
            Ok(report) => summary.absorb(&report),
            Err(e) => {
                tracing::error!(project_id = %project.id, error = %e, "Deadline dispatch failed");
            }
        }
    }

    tracing::info!(
        projects = projects.len(),
        messages = summary.messages,
        sent = summary.sent,
        "Project deadline scan complete"
    );
    Ok(summary)
}

fn message_for(project: &DeadlineProject, today: NaiveDate) -> NotificationMessage {
    let body = match project.end_date.map(|end| (end - today).num_days()) {
        Some(1) => format!("\"{}\" is due tomorrow.", project.name),
        Some(days) => format!("\"{}\" is due in {days} days.", project.name),
        None => format!("\"{}\" is approaching its deadline.", project.name),
    };

    NotificationMessage::new("Project deadline approaching", body, NotificationCategory::Project)
        .with_url(format!("/dashboard/projects/{}", project.id))
}
