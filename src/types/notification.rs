use serde::{Deserialize, Serialize};

/// A user-facing notification handed to the host notification surface.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub priority: u8,
}
