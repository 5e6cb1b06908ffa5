//! Bookmark Store for PageKeeper.
//!
//! Implements `BookmarkStoreTrait`: an ordered list of enriched bookmarks
//! kept as a single JSON array under the `bookmarks` storage key. Every
//! mutation reads the whole list, edits it and writes it back.

use std::sync::Arc;

use crate::database::KeyValueStore;
use crate::types::bookmark::Bookmark;
use crate::types::errors::{BookmarkError, StorageError};

/// Storage key holding the bookmark list.
pub const BOOKMARKS_KEY: &str = "bookmarks";

/// Trait defining bookmark store operations.
pub trait BookmarkStoreTrait {
    fn append(&self, bookmark: Bookmark) -> Result<(), BookmarkError>;
    /// All bookmarks in insertion order.
    fn list(&self) -> Result<Vec<Bookmark>, BookmarkError>;
    /// Removes the element at `index` of the stored (unfiltered, unreversed) list.
    fn delete_by_index(&self, index: usize) -> Result<Bookmark, BookmarkError>;
    /// Removes every bookmark with the given URL. Returns how many were removed.
    fn delete_by_url(&self, url: &str) -> Result<usize, BookmarkError>;
    fn find_by_url(&self, url: &str) -> Result<Option<Bookmark>, BookmarkError>;
    /// Matches paired with their index in the stored list.
    fn search(&self, query: &str) -> Result<Vec<(usize, Bookmark)>, BookmarkError>;
    fn deadline_items(&self) -> Result<Vec<Bookmark>, BookmarkError>;
}

/// Bookmark store over any key-value backend.
pub struct BookmarkStore {
    storage: Arc<dyn KeyValueStore>,
}

impl BookmarkStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        Self { storage }
    }

    fn read(&self) -> Result<Vec<Bookmark>, BookmarkError> {
        match self.storage.get(BOOKMARKS_KEY)? {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| BookmarkError::Storage(StorageError::from(e))),
            None => Ok(Vec::new()),
        }
    }

    fn write(&self, bookmarks: &[Bookmark]) -> Result<(), BookmarkError> {
        let value = serde_json::to_value(bookmarks).map_err(StorageError::from)?;
        self.storage.set(BOOKMARKS_KEY, &value)?;
        Ok(())
    }

    /// Whether `bookmark` matches an already lowercased `needle`.
    fn matches_query(bookmark: &Bookmark, needle: &str) -> bool {
        let hit = |s: &str| s.to_lowercase().contains(needle);
        hit(&bookmark.title)
            || hit(&bookmark.summary)
            || bookmark
                .email_data
                .as_ref()
                .map(|e| hit(&e.summary) || hit(&e.topic))
                .unwrap_or(false)
    }
}

impl BookmarkStoreTrait for BookmarkStore {
    fn append(&self, bookmark: Bookmark) -> Result<(), BookmarkError> {
        let mut all = self.read()?;
        all.push(bookmark);
        self.write(&all)
    }

    fn list(&self) -> Result<Vec<Bookmark>, BookmarkError> {
        self.read()
    }

    fn delete_by_index(&self, index: usize) -> Result<Bookmark, BookmarkError> {
        let mut all = self.read()?;
        if index >= all.len() {
            return Err(BookmarkError::InvalidIndex(index));
        }
        let removed = all.remove(index);
        self.write(&all)?;
        Ok(removed)
    }

    fn delete_by_url(&self, url: &str) -> Result<usize, BookmarkError> {
        let all = self.read()?;
        let before = all.len();
        let kept: Vec<Bookmark> = all.into_iter().filter(|b| b.url != url).collect();
        let removed = before - kept.len();
        if removed > 0 {
            self.write(&kept)?;
        }
        Ok(removed)
    }

    fn find_by_url(&self, url: &str) -> Result<Option<Bookmark>, BookmarkError> {
        Ok(self.read()?.into_iter().find(|b| b.url == url))
    }

    /// Case-insensitive substring match over title, summary and email topic/summary.
    fn search(&self, query: &str) -> Result<Vec<(usize, Bookmark)>, BookmarkError> {
        let needle = query.to_lowercase();
        Ok(self
            .read()?
            .into_iter()
            .enumerate()
            .filter(|(_, b)| Self::matches_query(b, &needle))
            .collect())
    }

    fn deadline_items(&self) -> Result<Vec<Bookmark>, BookmarkError> {
        Ok(self.read()?.into_iter().filter(|b| b.has_deadline).collect())
    }
}
