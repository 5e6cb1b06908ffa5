use std::fmt;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::bookmark::DeadlineType;

/// A live alarm as reported by the host scheduling facility.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Alarm {
    pub name: String,
    /// Absolute fire time in epoch milliseconds.
    pub fire_at: i64,
}

/// What an alarm was created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlarmKind {
    Deadline,
}

impl AlarmKind {
    fn prefix(&self) -> &'static str {
        match self {
            AlarmKind::Deadline => "deadline",
        }
    }
}

/// Structured alarm identity: (kind, owning bookmark url, deadline ordinal).
///
/// Encoded as `deadline:<base64url(owner)>:<ordinal>`. The base64url alphabet
/// never contains `:`, so the owner decodes exactly whatever characters the
/// URL holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AlarmName {
    pub kind: AlarmKind,
    pub owner: String,
    pub ordinal: usize,
}

impl AlarmName {
    pub fn deadline(owner: &str, ordinal: usize) -> Self {
        Self {
            kind: AlarmKind::Deadline,
            owner: owner.to_string(),
            ordinal,
        }
    }

    pub fn encode(&self) -> String {
        format!(
            "{}:{}:{}",
            self.kind.prefix(),
            URL_SAFE_NO_PAD.encode(self.owner.as_bytes()),
            self.ordinal
        )
    }

    /// Decodes a host alarm name. Returns `None` for names this agent did not create.
    pub fn decode(name: &str) -> Option<Self> {
        let rest = name.strip_prefix("deadline:")?;
        let (owner, ordinal) = rest.rsplit_once(':')?;
        let ordinal = ordinal.parse::<usize>().ok()?;
        let bytes = URL_SAFE_NO_PAD.decode(owner).ok()?;
        let owner = String::from_utf8(bytes).ok()?;
        Some(Self {
            kind: AlarmKind::Deadline,
            owner,
            ordinal,
        })
    }

    /// Cheap prefix check used before attempting a full decode.
    pub fn is_reminder(name: &str) -> bool {
        name.starts_with("deadline:")
    }
}

impl fmt::Display for AlarmName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Lead time per deadline type: how long before the deadline the reminder fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderPolicy {
    pub event: Duration,
    pub assignment: Duration,
    pub meeting: Duration,
    pub other: Duration,
}

impl Default for ReminderPolicy {
    fn default() -> Self {
        Self {
            event: Duration::hours(24),
            assignment: Duration::hours(4),
            meeting: Duration::minutes(20),
            other: Duration::hours(1),
        }
    }
}

impl ReminderPolicy {
    pub fn lead_time(&self, kind: DeadlineType) -> Duration {
        match kind {
            DeadlineType::Event => self.event,
            DeadlineType::Assignment => self.assignment,
            DeadlineType::Meeting => self.meeting,
            DeadlineType::Other => self.other,
        }
    }
}
