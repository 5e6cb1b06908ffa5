// PageKeeper state managers
// Managers own host-side state: the bookmark store, scheduled alarms and shown notifications.

pub mod alarm_manager;
pub mod bookmark_manager;
pub mod notification_manager;
