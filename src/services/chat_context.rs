//! Chat context assembly.
//!
//! Gathers everything the assistant may answer from: stored bookmarks,
//! email-like deadline records and the last scraped chat transcript.

use std::sync::Arc;

use serde_json::{json, Value};

use crate::database::KeyValueStore;
use crate::managers::bookmark_manager::{BookmarkStore, BookmarkStoreTrait};
use crate::types::errors::{BookmarkError, StorageError};
use crate::types::page::{ChatMessage, ChatRequest};

/// Storage key for extra email records contributed by other components.
pub const DEADLINE_EMAILS_KEY: &str = "deadlineEmails";
/// Storage key for the last transcript sent for summarization.
pub const LAST_CHAT_KEY: &str = "lastChatMessages";

pub struct ChatContext {
    store: Arc<BookmarkStore>,
    storage: Arc<dyn KeyValueStore>,
}

impl ChatContext {
    pub fn new(store: Arc<BookmarkStore>, storage: Arc<dyn KeyValueStore>) -> Self {
        Self { store, storage }
    }

    fn read_array(&self, key: &str) -> Result<Vec<Value>, StorageError> {
        match self.storage.get(key)? {
            Some(Value::Array(items)) => Ok(items),
            _ => Ok(Vec::new()),
        }
    }

    /// Deadline bookmarks as `{title, summary}`, then any stored `deadlineEmails` records.
    pub fn emails(&self) -> Result<Vec<Value>, BookmarkError> {
        let mut emails: Vec<Value> = self
            .store
            .deadline_items()?
            .into_iter()
            .map(|b| json!({ "title": b.title, "summary": b.summary }))
            .collect();
        emails.extend(self.read_array(DEADLINE_EMAILS_KEY)?);
        Ok(emails)
    }

    pub fn last_transcript(&self) -> Result<Vec<ChatMessage>, StorageError> {
        match self.storage.get(LAST_CHAT_KEY)? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Vec::new()),
        }
    }

    /// Replaces the remembered transcript.
    pub fn save_transcript(&self, messages: &[ChatMessage]) -> Result<(), StorageError> {
        let value = serde_json::to_value(messages)?;
        self.storage.set(LAST_CHAT_KEY, &value)
    }

    pub fn build_request(&self, message: &str) -> Result<ChatRequest, BookmarkError> {
        Ok(ChatRequest {
            message: message.to_string(),
            bookmarks: self.store.list()?,
            emails: self.emails()?,
            chat: self.last_transcript()?,
        })
    }
}
