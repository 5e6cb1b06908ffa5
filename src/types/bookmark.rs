use serde::{Deserialize, Serialize};

/// An enriched bookmark as returned by the summarization service.
///
/// `url` is the correlation key between a bookmark and its deadline alarms,
/// so it must survive every store rewrite unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Bookmark {
    /// Empty when the service omitted it; filled from the page before storing.
    #[serde(default)]
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub saved_on: String,
    #[serde(default)]
    pub has_deadline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_data: Option<EmailData>,
    /// `email` or `webpage`, as classified by the service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
}

impl Bookmark {
    /// Deadlines to schedule, or an empty slice when the bookmark carries none.
    pub fn deadlines(&self) -> &[String] {
        match (&self.email_data, self.has_deadline) {
            (Some(email), true) => &email.deadlines,
            _ => &[],
        }
    }

    pub fn deadline_type(&self) -> DeadlineType {
        self.email_data
            .as_ref()
            .map(EmailData::deadline_type)
            .unwrap_or(DeadlineType::Other)
    }
}

/// Structured data extracted from an email-like page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EmailData {
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub action_items: Vec<String>,
    /// Free-form date-time strings; the position doubles as the alarm ordinal.
    #[serde(default)]
    pub deadlines: Vec<String>,
    /// Kept verbatim so unknown values round-trip; read through [`EmailData::deadline_type`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<String>,
}

impl EmailData {
    pub fn deadline_type(&self) -> DeadlineType {
        DeadlineType::parse(self.deadline_type.as_deref())
    }
}

/// Kind of deadline, which decides how early the reminder fires.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DeadlineType {
    Event,
    Assignment,
    Meeting,
    Other,
}

impl DeadlineType {
    /// Maps a raw service value to a type. Absent or unrecognized values are `Other`.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("event") => DeadlineType::Event,
            Some("assignment") => DeadlineType::Assignment,
            Some("meeting") => DeadlineType::Meeting,
            _ => DeadlineType::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeadlineType::Event => "event",
            DeadlineType::Assignment => "assignment",
            DeadlineType::Meeting => "meeting",
            DeadlineType::Other => "other",
        }
    }
}
