//! Comment notifier: fired synchronously when a comment is created, not
//! on a schedule like the scanners.

use peyk_core::types::UserId;
use peyk_core::{NotificationCategory, NotificationMessage};
use peyk_push::{DispatchReport, Dispatcher, PushError};
use uuid::Uuid;

/// Everything the notifier needs about a freshly created comment.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CommentContext {
    pub task_id: Uuid,
    pub task_title: String,
    pub author_id: UserId,
    pub assignee_id: Option<UserId>,
    pub mentioned_user_ids: Vec<UserId>,
    /// First line of the comment, shown as the notification body.
    pub snippet: String,
}

/// Recipient set: task assignee plus mentioned users, minus the comment's
/// author, deduplicated with order preserved (assignee first).
pub fn recipients(ctx: &CommentContext) -> Vec<UserId> {
    let mut out = Vec::with_capacity(1 + ctx.mentioned_user_ids.len());
    for candidate in ctx.assignee_id.iter().chain(&ctx.mentioned_user_ids) {
        if *candidate != ctx.author_id && !out.contains(candidate) {
            out.push(*candidate);
        }
    }
    out
}

/// Notify everyone who should see the new comment. An empty recipient set
/// (author commenting on their own unwatched task) is a zero report.
pub async fn notify_created(
    dispatcher: &Dispatcher,
    ctx: &CommentContext,
) -> Result<DispatchReport, PushError> {
    let recipients = recipients(ctx);
    let message = NotificationMessage::new(
        format!("New comment on \"{}\"", ctx.task_title),
        ctx.snippet.clone(),
        NotificationCategory::Task,
    )
    .with_url(format!("/dashboard/tasks/{}", ctx.task_id));

    dispatcher.dispatch(&message, &recipients).await
}
