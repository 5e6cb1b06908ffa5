//! App Core for PageKeeper.
//!
//! Central struct wiring the store, scheduler, dispatcher, extractor and
//! remote client together. It owns the active page and implements the
//! bookmark and deletion flows that span several components.

use std::fs;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::{info, warn};

use crate::database::{Database, KeyValueStore};
use crate::events::ListedBookmark;
use crate::managers::alarm_manager::AlarmHost;
use crate::managers::bookmark_manager::{BookmarkStore, BookmarkStoreTrait};
use crate::managers::notification_manager::Notifier;
use crate::platform;
use crate::services::chat_context::ChatContext;
use crate::services::clock::{Clock, SystemClock};
use crate::services::content_extractor::{ContentExtractor, ContentExtractorTrait};
use crate::services::deadline_scheduler::{DeadlineScheduler, ReminderSchedulerTrait};
use crate::services::enrichment_client::{HttpRemoteService, RemoteService};
use crate::services::document::{Document, PageSource};
use crate::services::notification_dispatcher::{DispatchOutcome, NotificationDispatcher};
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::types::bookmark::Bookmark;
use crate::types::errors::{AgentError, ExtractionError, StorageError};
use crate::types::page::{ChatMessage, PageContent};
use crate::types::settings::AgentSettings;

/// Result of a deletion: how many records and timers went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deletion {
    pub removed: usize,
    pub alarms_cleared: usize,
}

pub struct App {
    pub store: Arc<BookmarkStore>,
    pub scheduler: DeadlineScheduler,
    pub dispatcher: NotificationDispatcher,
    pub extractor: ContentExtractor,
    pub chat: ChatContext,
    pub remote: Arc<dyn RemoteService>,
    pub alarms: Arc<dyn AlarmHost>,
    settings_engine: Mutex<SettingsEngine>,
    max_transcript_messages: usize,
    active_page: Mutex<Option<PageSource>>,
}

impl App {
    /// Opens the database under the data directory and talks to the configured service.
    pub fn open(
        settings_engine: SettingsEngine,
        alarms: Arc<dyn AlarmHost>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, AgentError> {
        let settings = settings_engine.effective();
        let data_dir = platform::get_data_dir();
        fs::create_dir_all(&data_dir).map_err(|e| {
            AgentError::Storage(format!("cannot create {}: {}", data_dir.display(), e))
        })?;
        let db_path = data_dir.join(&settings.storage.database_file);
        let db = Database::open(&db_path).map_err(StorageError::from)?;
        info!("database at {}", db_path.display());

        let remote = HttpRemoteService::new(&settings.service)?;
        info!("summarization service at {}", remote.base_url());

        Ok(Self::with_components(
            Arc::new(db),
            settings_engine,
            Arc::new(remote),
            alarms,
            notifier,
            Arc::new(SystemClock),
        ))
    }

    pub fn with_components(
        storage: Arc<dyn KeyValueStore>,
        settings_engine: SettingsEngine,
        remote: Arc<dyn RemoteService>,
        alarms: Arc<dyn AlarmHost>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let settings = settings_engine.effective();
        let store = Arc::new(BookmarkStore::new(storage.clone()));
        let scheduler = DeadlineScheduler::new(alarms.clone(), clock, settings.reminders.policy())
            .with_naive_offset_minutes(settings.reminders.naive_utc_offset_minutes);

        Self {
            dispatcher: NotificationDispatcher::new(store.clone(), notifier),
            chat: ChatContext::new(store.clone(), storage),
            store,
            scheduler,
            extractor: ContentExtractor::new(),
            remote,
            alarms,
            settings_engine: Mutex::new(settings_engine),
            max_transcript_messages: settings.chat.max_transcript_messages,
            active_page: Mutex::new(None),
        }
    }

    // ─── Active page ───

    pub fn set_active_page(&self, url: &str, title: Option<&str>, html: &str) {
        *lock(&self.active_page) = Some(PageSource::new(url, title, html));
    }

    pub fn clear_active_page(&self) {
        *lock(&self.active_page) = None;
    }

    /// Parses the active page. The parsed tree is not `Send`, so it never outlives the call.
    fn active_document(&self) -> Result<Document, AgentError> {
        let source = lock(&self.active_page)
            .clone()
            .ok_or(AgentError::NoActiveContext)?;
        Ok(source.parse())
    }

    pub fn scrape(&self) -> Result<PageContent, AgentError> {
        Ok(self.extractor.extract(&self.active_document()?))
    }

    pub fn extract_chat(&self) -> Result<Vec<ChatMessage>, AgentError> {
        let doc = self.active_document()?;
        Ok(self.extractor.extract_chat(&doc, self.max_transcript_messages))
    }

    // ─── Bookmarks ───

    /// Extraction step of the bookmark flow. Empty pages are refused before any remote call.
    pub fn extract_for_bookmark(&self) -> Result<PageContent, AgentError> {
        let page = self.scrape()?;
        if page.content.trim().is_empty() {
            return Err(ExtractionError::Empty(format!("no readable text on {}", page.url)).into());
        }
        Ok(page)
    }

    /// Enrichment step: remote call, append, then reminders. Returns the stored record and timer count.
    pub async fn enrich_and_store(&self, page: &PageContent) -> Result<(Bookmark, usize), AgentError> {
        let mut bookmark = self.remote.enrich_bookmark(page).await.map_err(|e| {
            warn!("enrichment of {} failed: {}", page.url, e);
            AgentError::from(e)
        })?;
        if bookmark.url.is_empty() {
            bookmark.url = page.url.clone();
        }
        self.store.append(bookmark.clone())?;
        let scheduled = self.scheduler.schedule_for(&bookmark);
        info!("bookmarked {} ({} reminders)", bookmark.url, scheduled.len());
        Ok((bookmark, scheduled.len()))
    }

    /// Stored bookmarks, newest first, filtered by `keep`, each with its true store index.
    fn listed<F>(&self, keep: F) -> Result<Vec<ListedBookmark>, AgentError>
    where
        F: Fn(&Bookmark) -> bool,
    {
        let mut items: Vec<ListedBookmark> = self
            .store
            .list()?
            .into_iter()
            .enumerate()
            .filter(|(_, b)| keep(b))
            .map(|(index, bookmark)| ListedBookmark { index, bookmark })
            .collect();
        items.reverse();
        Ok(items)
    }

    pub fn list_bookmarks(&self) -> Result<Vec<ListedBookmark>, AgentError> {
        self.listed(|_| true)
    }

    pub fn list_deadlines(&self) -> Result<Vec<ListedBookmark>, AgentError> {
        self.listed(|b| b.has_deadline)
    }

    pub fn search_bookmarks(&self, query: &str) -> Result<Vec<ListedBookmark>, AgentError> {
        Ok(self
            .store
            .search(query)?
            .into_iter()
            .rev()
            .map(|(index, bookmark)| ListedBookmark { index, bookmark })
            .collect())
    }

    /// Removes every bookmark with `url` and all of its timers.
    ///
    /// Timers are cleared even when the store update fails; the store error is reported afterwards.
    pub fn delete_bookmark(&self, url: &str) -> Result<Deletion, AgentError> {
        let removed = self.store.delete_by_url(url);
        let alarms_cleared = self.scheduler.cancel_all_for(url);
        let removed = removed.map_err(|e| {
            warn!("store delete of {} failed after clearing {} timers: {}", url, alarms_cleared, e);
            AgentError::from(e)
        })?;
        info!("deleted {} ({} records, {} timers)", url, removed, alarms_cleared);
        Ok(Deletion {
            removed,
            alarms_cleared,
        })
    }

    /// Removes the record at `index`. Timers are cleared only once no record with that URL remains.
    pub fn delete_bookmark_at(&self, index: usize) -> Result<(String, Deletion), AgentError> {
        let removed = self.store.delete_by_index(index)?;
        let alarms_cleared = match self.store.find_by_url(&removed.url)? {
            Some(_) => 0,
            None => self.scheduler.cancel_all_for(&removed.url),
        };
        info!("deleted #{} {} ({} timers)", index, removed.url, alarms_cleared);
        Ok((
            removed.url,
            Deletion {
                removed: 1,
                alarms_cleared,
            },
        ))
    }

    pub fn clear_deadline_alarms(&self, url: &str) -> usize {
        self.scheduler.cancel_all_for(url)
    }

    /// Re-registers reminders for every stored deadline bookmark. Returns the timer count.
    pub fn reschedule_all(&self) -> Result<usize, AgentError> {
        let total = self
            .store
            .deadline_items()?
            .iter()
            .map(|b| self.scheduler.schedule_for(b).len())
            .sum();
        info!("rescheduled {} reminders", total);
        Ok(total)
    }

    pub fn on_alarm(&self, name: &str) -> DispatchOutcome {
        self.dispatcher.on_alarm(name)
    }

    // ─── Chat ───

    pub async fn chat(&self, message: &str) -> Result<String, AgentError> {
        let request = self.chat.build_request(message)?;
        Ok(self.remote.chat(&request).await?)
    }

    /// Scrapes the transcript, remembers it for later chats, then summarizes it.
    pub async fn summarize_chat(&self) -> Result<String, AgentError> {
        let messages = self.extract_chat()?;
        self.chat.save_transcript(&messages)?;
        Ok(self.remote.summarize_chat(&messages).await?)
    }

    // ─── Settings ───

    pub fn settings(&self) -> AgentSettings {
        lock(&self.settings_engine).effective()
    }

    /// Persists one setting. Reminder and service changes apply from the next start.
    pub fn set_setting(&self, key: &str, value: serde_json::Value) -> Result<(), AgentError> {
        lock(&self.settings_engine).set_value(key, value)?;
        Ok(())
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    match m.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
