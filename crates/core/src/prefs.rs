//! The preference filter.
//!
//! This module is the single source of truth for the opt-out defaults:
//! task, project, and calendar notifications are ON unless the user turned
//! them off; financial notifications are OFF unless the user turned them on
//! (financial data is sensitive, so the default is deliberately inverted).
//! `general` notifications are never filtered at all.
//!
//! A missing preference row, or a missing individual flag, is a valid
//! defaulted state — never an error.

use crate::category::NotificationCategory;

/// A user's stored per-category flags.
///
/// `None` means the user never touched that flag and the category default
/// applies. Built from a `notification_preferences` row; a user with no row
/// is represented as `Option<&PreferenceFlags>::None` at the call site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreferenceFlags {
    pub task: Option<bool>,
    pub project: Option<bool>,
    pub calendar: Option<bool>,
    pub financial: Option<bool>,
}

/// Whether a notification of `category` should be delivered to a user whose
/// stored flags are `flags` (`None` when no preference row exists).
pub fn should_notify(flags: Option<&PreferenceFlags>, category: NotificationCategory) -> bool {
    match category {
        NotificationCategory::General => true,
        NotificationCategory::Task => stored(flags, |f| f.task).unwrap_or(true),
        NotificationCategory::Project => stored(flags, |f| f.project).unwrap_or(true),
        NotificationCategory::Calendar => stored(flags, |f| f.calendar).unwrap_or(true),
        // Inverted default: financial notifications are opt-in.
        NotificationCategory::Financial => stored(flags, |f| f.financial).unwrap_or(false),
    }
}

fn stored(
    flags: Option<&PreferenceFlags>,
    pick: impl Fn(&PreferenceFlags) -> Option<bool>,
) -> Option<bool> {
    flags.and_then(pick)
}
