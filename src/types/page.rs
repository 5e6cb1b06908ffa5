use serde::{Deserialize, Serialize};

/// Readable content extracted from the active page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageContent {
    pub url: String,
    pub title: String,
    pub content: String,
}

/// One message of a chat transcript scraped from a messaging web client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// Sender/time header as rendered by the client, e.g. `[10:02, 1/2/2025] Ana: `.
    #[serde(default)]
    pub meta: String,
    #[serde(default)]
    pub text: String,
}

/// Body of a `POST /chat` request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ChatRequest {
    pub message: String,
    /// The full stored bookmark list.
    pub bookmarks: Vec<super::bookmark::Bookmark>,
    /// Email-like context records; their shape is owned by whoever stored them.
    pub emails: Vec<serde_json::Value>,
    /// The last summarized chat transcript.
    pub chat: Vec<ChatMessage>,
}
