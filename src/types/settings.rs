use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::alarm::ReminderPolicy;
use super::errors::SettingsError;

/// Default base URL of the summarization service.
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

/// Longest accepted reminder lead time: one leap year.
pub const MAX_LEAD_MINUTES: i64 = 366 * 24 * 60;
/// Offsets for naive deadline times stay strictly within one day.
pub const MAX_OFFSET_MINUTES: u32 = 24 * 60 - 1;

/// Top-level agent settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AgentSettings {
    #[serde(default)]
    pub service: ServiceSettings,
    #[serde(default)]
    pub reminders: ReminderSettings,
    #[serde(default)]
    pub chat: ChatSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Remote summarization service connection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceSettings {
    pub base_url: String,
    /// `None` leaves requests without a deadline.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            request_timeout_secs: None,
        }
    }
}

/// Reminder lead times, in minutes, per deadline type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReminderSettings {
    pub event_lead_minutes: i64,
    pub assignment_lead_minutes: i64,
    pub meeting_lead_minutes: i64,
    pub other_lead_minutes: i64,
    /// Offset applied to deadlines written without a timezone.
    #[serde(default)]
    pub naive_utc_offset_minutes: i32,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            event_lead_minutes: 24 * 60,
            assignment_lead_minutes: 4 * 60,
            meeting_lead_minutes: 20,
            other_lead_minutes: 60,
            naive_utc_offset_minutes: 0,
        }
    }
}

impl AgentSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.reminders.validate()
    }
}

impl ReminderSettings {
    fn leads(&self) -> [(&'static str, i64); 4] {
        [
            ("event_lead_minutes", self.event_lead_minutes),
            ("assignment_lead_minutes", self.assignment_lead_minutes),
            ("meeting_lead_minutes", self.meeting_lead_minutes),
            ("other_lead_minutes", self.other_lead_minutes),
        ]
    }

    /// Lead times must lie in `0..=MAX_LEAD_MINUTES`, the offset within a day.
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (name, minutes) in self.leads() {
            if !(0..=MAX_LEAD_MINUTES).contains(&minutes) {
                return Err(SettingsError::InvalidValue(format!(
                    "reminders.{} must be between 0 and {}, got {}",
                    name, MAX_LEAD_MINUTES, minutes
                )));
            }
        }
        if self.naive_utc_offset_minutes.unsigned_abs() > MAX_OFFSET_MINUTES {
            return Err(SettingsError::InvalidValue(format!(
                "reminders.naive_utc_offset_minutes must be within {} minutes of UTC, got {}",
                MAX_OFFSET_MINUTES, self.naive_utc_offset_minutes
            )));
        }
        Ok(())
    }

    /// Lead-time table. Out-of-range entries fall back to the default for that type.
    pub fn policy(&self) -> ReminderPolicy {
        let defaults = ReminderPolicy::default();
        let lead = |minutes: i64, fallback: Duration| {
            if (0..=MAX_LEAD_MINUTES).contains(&minutes) {
                Duration::try_minutes(minutes).unwrap_or(fallback)
            } else {
                fallback
            }
        };
        ReminderPolicy {
            event: lead(self.event_lead_minutes, defaults.event),
            assignment: lead(self.assignment_lead_minutes, defaults.assignment),
            meeting: lead(self.meeting_lead_minutes, defaults.meeting),
            other: lead(self.other_lead_minutes, defaults.other),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatSettings {
    pub max_transcript_messages: usize,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            max_transcript_messages: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    pub database_file: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_file: "pagekeeper.db".to_string(),
        }
    }
}
