//! Notification Dispatcher for PageKeeper.
//!
//! Reacts to fired alarms: resolves the owning bookmark from the store and
//! shows a reminder whose copy depends on the deadline type. An alarm whose
//! bookmark is gone is dropped without a notification.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::managers::bookmark_manager::{BookmarkStore, BookmarkStoreTrait};
use crate::managers::notification_manager::Notifier;
use crate::types::alarm::AlarmName;
use crate::types::bookmark::DeadlineType;
use crate::types::notification::Notification;

/// Title shown on every deadline reminder.
pub const REMINDER_TITLE: &str = "Deadline Reminder";
/// Priority passed to the notification surface.
pub const REMINDER_PRIORITY: u8 = 2;

/// Terminal state of a fired alarm.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// A notification was emitted under the alarm name.
    Notified { id: String },
    /// The alarm was not one of ours.
    Ignored,
    /// The owning bookmark no longer exists.
    DroppedOrphan { url: String },
}

/// Reminder body for a deadline type.
pub fn reminder_message(kind: DeadlineType, title: &str) -> String {
    match kind {
        DeadlineType::Event => format!("Reminder: {}\nYour event is tomorrow.", title),
        DeadlineType::Assignment => format!("Reminder: Your assignment is due soon.\n{}", title),
        DeadlineType::Meeting => format!("Reminder: Your meeting starts soon.\n{}", title),
        DeadlineType::Other => format!("Reminder: Upcoming deadline.\n{}", title),
    }
}

pub struct NotificationDispatcher {
    store: Arc<BookmarkStore>,
    notifier: Arc<dyn Notifier>,
}

impl NotificationDispatcher {
    pub fn new(store: Arc<BookmarkStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Handles one fired alarm. Never retries and never fails outward.
    pub fn on_alarm(&self, name: &str) -> DispatchOutcome {
        if !AlarmName::is_reminder(name) {
            return DispatchOutcome::Ignored;
        }
        let alarm = match AlarmName::decode(name) {
            Some(alarm) => alarm,
            None => {
                debug!("ignoring malformed reminder alarm {}", name);
                return DispatchOutcome::Ignored;
            }
        };

        let bookmark = match self.store.find_by_url(&alarm.owner) {
            Ok(Some(bookmark)) => bookmark,
            Ok(None) => {
                info!("dropping orphan alarm {} for {}", name, alarm.owner);
                return DispatchOutcome::DroppedOrphan { url: alarm.owner };
            }
            Err(e) => {
                warn!("store lookup for alarm {} failed: {}", name, e);
                return DispatchOutcome::DroppedOrphan { url: alarm.owner };
            }
        };

        let notification = Notification {
            title: REMINDER_TITLE.to_string(),
            message: reminder_message(bookmark.deadline_type(), &bookmark.title),
            priority: REMINDER_PRIORITY,
        };
        self.notifier.create(name, &notification);
        info!("notified {} ({})", bookmark.url, bookmark.deadline_type().as_str());
        DispatchOutcome::Notified {
            id: name.to_string(),
        }
    }
}
