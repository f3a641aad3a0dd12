//! Grouping helpers shared by the per-assignee scanners.

use std::collections::BTreeMap;

use peyk_core::types::UserId;
use peyk_db::models::DueTask;

/// Bucket tasks by assignee, dropping unassigned ones. BTreeMap keeps the
/// iteration order stable for logging and tests.
pub(crate) fn by_assignee(tasks: Vec<DueTask>) -> BTreeMap<UserId, Vec<DueTask>> {
    let mut grouped: BTreeMap<UserId, Vec<DueTask>> = BTreeMap::new();
    for task in tasks {
        if let Some(assignee) = task.assignee_id {
            grouped.entry(assignee).or_default().push(task);
        }
    }
    grouped
}

/// Render up to `max` titles as a comma-separated preview, with an
/// ellipsis when more remain.
pub(crate) fn title_preview<'a, I>(titles: I, max: usize) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut titles = titles.into_iter();
    let mut preview: Vec<&str> = titles.by_ref().take(max).collect();
    if titles.next().is_some() {
        preview.push("…");
    }
    preview.join(", ")
}
