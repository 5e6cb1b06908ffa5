//! Wire protocol between the host shell and the agent.
//!
//! Requests: `{"id": <any>, "action": "BOOKMARK_PAGE", ...payload}`.
//! Replies:  `{"id": <same>, "event": "enriched", ...}`, possibly several per request.
//! Failures: `{"id": <same>, "success": false, "error": "..."}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::bookmark::Bookmark;
use crate::types::page::{ChatMessage, PageContent};
use crate::types::settings::AgentSettings;

/// Inbound commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Command {
    Ping,
    /// The active tab finished loading; replaces the active document.
    PageLoaded {
        url: String,
        #[serde(default)]
        title: Option<String>,
        html: String,
    },
    TabClosed,
    ScrapePage,
    ExtractWhatsappChat,
    BookmarkPage,
    ListBookmarks,
    ListDeadlines,
    SearchBookmarks {
        query: String,
    },
    DeleteBookmark {
        url: String,
    },
    /// `index` addresses the stored list, not a filtered or reversed view.
    DeleteBookmarkAt {
        index: usize,
    },
    DeleteDeadlineAlarms {
        url: String,
    },
    AlarmFired {
        name: String,
    },
    Chat {
        message: String,
    },
    SummarizeChat,
    GetSettings,
    SetSetting {
        key: String,
        value: Value,
    },
}

/// A bookmark together with its position in the stored list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListedBookmark {
    pub index: usize,
    #[serde(flatten)]
    pub bookmark: Bookmark,
}

/// Outbound replies and events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Reply {
    Ready {
        version: String,
    },
    Pong,
    Ok,
    Extracted(PageContent),
    ChatMessages {
        messages: Vec<ChatMessage>,
    },
    Enriched {
        bookmark: Bookmark,
        timers_scheduled: usize,
    },
    Bookmarks {
        items: Vec<ListedBookmark>,
    },
    Deleted {
        url: String,
        removed: usize,
        alarms_cleared: usize,
    },
    AlarmsCleared {
        url: String,
        count: usize,
    },
    Notified {
        id: String,
    },
    Ignored {
        name: String,
    },
    Dropped {
        name: String,
    },
    ChatReply {
        reply: String,
    },
    ChatSummary {
        summary: String,
    },
    Settings {
        settings: AgentSettings,
    },
}

/// Splits a raw request line into its id and command.
///
/// The id is recovered whenever the line is a JSON object, so failures can
/// still be correlated.
pub fn parse_request(line: &str) -> (Value, Result<Command, String>) {
    let value: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => return (Value::Null, Err(format!("parse error: {}", e))),
    };
    let id = value.get("id").cloned().unwrap_or(Value::Null);
    let command = serde_json::from_value::<Command>(value).map_err(|e| format!("invalid request: {}", e));
    (id, command)
}

/// Serializes `reply` with the request id attached.
pub fn reply_line(id: &Value, reply: &Reply) -> Value {
    let mut object = match serde_json::to_value(reply) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => Map::new(),
    };
    object.insert("id".to_string(), id.clone());
    Value::Object(object)
}

pub fn failure_line(id: &Value, error: &str) -> Value {
    serde_json::json!({ "id": id, "success": false, "error": error })
}
