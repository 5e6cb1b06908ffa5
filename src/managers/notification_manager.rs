//! Notification surface for PageKeeper.
//!
//! Delivery is fire-and-forget: the dispatcher never learns whether the
//! user actually saw a notification.

use std::sync::Mutex;

use tokio::sync::mpsc;
use tracing::warn;

use crate::types::notification::Notification;

/// Trait defining the host notification surface.
pub trait Notifier: Send + Sync {
    /// Shows `notification` under `id`. Reusing an id replaces the earlier one.
    fn create(&self, id: &str, notification: &Notification);
}

/// Records notifications in memory, in delivery order.
#[derive(Default)]
pub struct MemoryNotifier {
    shown: Mutex<Vec<(String, Notification)>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> Vec<(String, Notification)> {
        self.shown.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl Notifier for MemoryNotifier {
    fn create(&self, id: &str, notification: &Notification) {
        if let Ok(mut shown) = self.shown.lock() {
            shown.retain(|(existing, _)| existing != id);
            shown.push((id.to_string(), notification.clone()));
        }
    }
}

/// Forwards notifications to the host shell as `notification` events.
pub struct ChannelNotifier {
    out: mpsc::UnboundedSender<serde_json::Value>,
}

impl ChannelNotifier {
    pub fn new(out: mpsc::UnboundedSender<serde_json::Value>) -> Self {
        Self { out }
    }
}

impl Notifier for ChannelNotifier {
    fn create(&self, id: &str, notification: &Notification) {
        let event = serde_json::json!({
            "event": "notification",
            "id": id,
            "title": notification.title,
            "message": notification.message,
            "priority": notification.priority,
        });
        if self.out.send(event).is_err() {
            warn!("notification {} dropped: output channel closed", id);
        }
    }
}
