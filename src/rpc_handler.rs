//! Command handler for the PageKeeper host protocol.
//!
//! Separate from `rpc_server.rs` so it can be tested without stdin/stdout.
//! `handle_command` is the single dispatch point: every inbound [`Command`]
//! maps to one arm that calls into [`App`] and yields the replies to send.

use tracing::debug;

use crate::app::App;
use crate::events::{Command, Reply};
use crate::services::notification_dispatcher::DispatchOutcome;
use crate::types::errors::AgentError;

/// Runs one command. Multi-step flows send intermediate replies through `emit`
/// before the final one is returned.
pub async fn handle_command<E>(app: &App, command: Command, mut emit: E) -> Result<Reply, AgentError>
where
    E: FnMut(Reply) + Send,
{
    debug!("handling {}", command_name(&command));
    match command {
        Command::Ping => Ok(Reply::Pong),

        // ─── Active page ───
        Command::PageLoaded { url, title, html } => {
            app.set_active_page(&url, title.as_deref(), &html);
            Ok(Reply::Ok)
        }
        Command::TabClosed => {
            app.clear_active_page();
            Ok(Reply::Ok)
        }
        Command::ScrapePage => Ok(Reply::Extracted(app.scrape()?)),
        Command::ExtractWhatsappChat => Ok(Reply::ChatMessages {
            messages: app.extract_chat()?,
        }),

        // ─── Bookmarks ───
        Command::BookmarkPage => {
            let page = app.extract_for_bookmark()?;
            emit(Reply::Extracted(page.clone()));
            let (bookmark, timers_scheduled) = app.enrich_and_store(&page).await?;
            Ok(Reply::Enriched {
                bookmark,
                timers_scheduled,
            })
        }
        Command::ListBookmarks => Ok(Reply::Bookmarks {
            items: app.list_bookmarks()?,
        }),
        Command::ListDeadlines => Ok(Reply::Bookmarks {
            items: app.list_deadlines()?,
        }),
        Command::SearchBookmarks { query } => Ok(Reply::Bookmarks {
            items: app.search_bookmarks(&query)?,
        }),
        Command::DeleteBookmark { url } => {
            let deletion = app.delete_bookmark(&url)?;
            Ok(Reply::Deleted {
                url,
                removed: deletion.removed,
                alarms_cleared: deletion.alarms_cleared,
            })
        }
        Command::DeleteBookmarkAt { index } => {
            let (url, deletion) = app.delete_bookmark_at(index)?;
            Ok(Reply::Deleted {
                url,
                removed: deletion.removed,
                alarms_cleared: deletion.alarms_cleared,
            })
        }

        // ─── Reminders ───
        Command::DeleteDeadlineAlarms { url } => {
            let count = app.clear_deadline_alarms(&url);
            Ok(Reply::AlarmsCleared { url, count })
        }
        Command::AlarmFired { name } => Ok(match app.on_alarm(&name) {
            DispatchOutcome::Notified { id } => Reply::Notified { id },
            DispatchOutcome::Ignored => Reply::Ignored { name },
            DispatchOutcome::DroppedOrphan { .. } => Reply::Dropped { name },
        }),

        // ─── Chat ───
        Command::Chat { message } => Ok(Reply::ChatReply {
            reply: app.chat(&message).await?,
        }),
        Command::SummarizeChat => Ok(Reply::ChatSummary {
            summary: app.summarize_chat().await?,
        }),

        // ─── Settings ───
        Command::GetSettings => Ok(Reply::Settings {
            settings: app.settings(),
        }),
        Command::SetSetting { key, value } => {
            app.set_setting(&key, value)?;
            Ok(Reply::Ok)
        }
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Ping => "PING",
        Command::PageLoaded { .. } => "PAGE_LOADED",
        Command::TabClosed => "TAB_CLOSED",
        Command::ScrapePage => "SCRAPE_PAGE",
        Command::ExtractWhatsappChat => "EXTRACT_WHATSAPP_CHAT",
        Command::BookmarkPage => "BOOKMARK_PAGE",
        Command::ListBookmarks => "LIST_BOOKMARKS",
        Command::ListDeadlines => "LIST_DEADLINES",
        Command::SearchBookmarks { .. } => "SEARCH_BOOKMARKS",
        Command::DeleteBookmark { .. } => "DELETE_BOOKMARK",
        Command::DeleteBookmarkAt { .. } => "DELETE_BOOKMARK_AT",
        Command::DeleteDeadlineAlarms { .. } => "DELETE_DEADLINE_ALARMS",
        Command::AlarmFired { .. } => "ALARM_FIRED",
        Command::Chat { .. } => "CHAT",
        Command::SummarizeChat => "SUMMARIZE_CHAT",
        Command::GetSettings => "GET_SETTINGS",
        Command::SetSetting { .. } => "SET_SETTING",
    }
}
