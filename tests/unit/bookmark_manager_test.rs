//! Unit tests for the Bookmark Store through `BookmarkStoreTrait`, backed by
//! an in-memory SQLite database.

use std::sync::Arc;

use pagekeeper::database::{Database, KeyValueStore};
use pagekeeper::managers::bookmark_manager::{BookmarkStore, BookmarkStoreTrait, BOOKMARKS_KEY};
use pagekeeper::types::bookmark::{Bookmark, EmailData};
use pagekeeper::types::errors::BookmarkError;

fn setup() -> (Arc<Database>, BookmarkStore) {
    let db = Arc::new(Database::open_in_memory().expect("Failed to open in-memory database"));
    let store = BookmarkStore::new(db.clone());
    (db, store)
}

fn page(url: &str, title: &str) -> Bookmark {
    Bookmark {
        url: url.to_string(),
        title: title.to_string(),
        summary: format!("Summary of {}", title),
        category: "Tech".to_string(),
        saved_on: "2025-01-01 10:00:00".to_string(),
        has_deadline: false,
        email_data: None,
        mode: Some("webpage".to_string()),
        original_title: None,
    }
}

fn email(url: &str, topic: &str, deadlines: &[&str]) -> Bookmark {
    Bookmark {
        has_deadline: true,
        mode: Some("email".to_string()),
        email_data: Some(EmailData {
            topic: topic.to_string(),
            summary: format!("{} details", topic),
            action_items: vec!["Reply".to_string()],
            deadlines: deadlines.iter().map(|d| d.to_string()).collect(),
            deadline_type: Some("meeting".to_string()),
            sender: None,
            urgency: None,
        }),
        ..page(url, topic)
    }
}

#[test]
fn test_empty_store_lists_nothing() {
    let (_db, store) = setup();
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn test_append_keeps_insertion_order_and_fields() {
    let (_db, store) = setup();
    let a = page("https://a.example", "A");
    let b = email("https://mail.example/b", "Standup", &["2030-01-01T10:00:00Z"]);
    store.append(a.clone()).unwrap();
    store.append(b.clone()).unwrap();
    assert_eq!(store.list().unwrap(), vec![a, b]);
}

#[test]
fn test_delete_by_index_addresses_stored_order() {
    let (_db, store) = setup();
    store.append(page("https://a.example", "A")).unwrap();
    store.append(page("https://b.example", "B")).unwrap();
    store.append(page("https://c.example", "C")).unwrap();

    let removed = store.delete_by_index(1).unwrap();
    assert_eq!(removed.url, "https://b.example");
    let urls: Vec<String> = store.list().unwrap().into_iter().map(|b| b.url).collect();
    assert_eq!(urls, vec!["https://a.example", "https://c.example"]);
}

#[test]
fn test_delete_by_index_out_of_range() {
    let (_db, store) = setup();
    store.append(page("https://a.example", "A")).unwrap();
    assert!(matches!(store.delete_by_index(1), Err(BookmarkError::InvalidIndex(1))));
    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn test_delete_by_url_removes_every_match() {
    let (_db, store) = setup();
    store.append(page("https://a.example", "A1")).unwrap();
    store.append(page("https://b.example", "B")).unwrap();
    store.append(page("https://a.example", "A2")).unwrap();

    assert_eq!(store.delete_by_url("https://a.example").unwrap(), 2);
    assert_eq!(store.list().unwrap().len(), 1);
    assert_eq!(store.delete_by_url("https://a.example").unwrap(), 0);
}

#[test]
fn test_delete_by_url_is_exact_not_prefix() {
    let (_db, store) = setup();
    store.append(page("https://a.example/x", "X")).unwrap();
    store.append(page("https://a.example/xy", "XY")).unwrap();
    assert_eq!(store.delete_by_url("https://a.example/x").unwrap(), 1);
    assert_eq!(store.list().unwrap()[0].url, "https://a.example/xy");
}

#[test]
fn test_find_by_url_returns_first_match() {
    let (_db, store) = setup();
    store.append(page("https://a.example", "First")).unwrap();
    store.append(page("https://a.example", "Second")).unwrap();
    assert_eq!(store.find_by_url("https://a.example").unwrap().unwrap().title, "First");
    assert!(store.find_by_url("https://missing.example").unwrap().is_none());
}

#[test]
fn test_search_is_case_insensitive_over_email_fields() {
    let (_db, store) = setup();
    store.append(page("https://rust.example", "Rust Async Book")).unwrap();
    store.append(email("https://mail.example/1", "Quarterly Review", &[])).unwrap();

    assert_eq!(store.search("ASYNC").unwrap().len(), 1);
    let hits = store.search("quarterly").unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].0, 1);
    assert_eq!(hits[0].1.url, "https://mail.example/1");
    assert!(store.search("nothing here").unwrap().is_empty());
}

#[test]
fn test_deadline_items_filters_on_flag() {
    let (_db, store) = setup();
    store.append(page("https://a.example", "A")).unwrap();
    store.append(email("https://mail.example/1", "Exam", &["2030-01-01"])).unwrap();
    let items = store.deadline_items().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Exam");
}

#[test]
fn test_unknown_fields_and_raw_deadline_type_survive_rewrite() {
    let (db, store) = setup();
    let mut odd = email("https://mail.example/odd", "Odd", &["2030-01-01"]);
    if let Some(e) = odd.email_data.as_mut() {
        e.deadline_type = Some("Webinar".to_string());
    }
    store.append(odd).unwrap();
    store.append(page("https://a.example", "A")).unwrap();
    store.delete_by_index(1).unwrap();

    let raw = db.get(BOOKMARKS_KEY).unwrap().unwrap();
    assert_eq!(raw[0]["email_data"]["deadline_type"], "Webinar");
}
