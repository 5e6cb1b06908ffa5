//! Unit tests for the SettingsEngine: defaults, dot-path updates, reset and
//! the in-memory service URL override.

use std::fs;
use std::path::PathBuf;

use serde_json::json;
use tempfile::TempDir;

use pagekeeper::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use pagekeeper::types::errors::SettingsError;
use pagekeeper::types::settings::{AgentSettings, DEFAULT_API_BASE};

fn setup() -> (SettingsEngine, PathBuf, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let path = tmp.path().join("settings.json");
    let engine = SettingsEngine::new(Some(path.clone())).with_api_base_override(None);
    (engine, path, tmp)
}

#[test]
fn test_load_defaults_when_no_file() {
    let (mut engine, path, _tmp) = setup();
    let settings = engine.load().unwrap();
    assert_eq!(settings, AgentSettings::default());
    assert_eq!(settings.service.base_url, DEFAULT_API_BASE);
    assert!(settings.service.request_timeout_secs.is_none());
    assert!(!path.exists());
}

#[test]
fn test_set_value_persists_across_engines() {
    let (mut engine, path, _tmp) = setup();
    engine.load().unwrap();
    engine
        .set_value("reminders.meeting_lead_minutes", json!(30))
        .unwrap();

    let mut reloaded = SettingsEngine::new(Some(path)).with_api_base_override(None);
    let settings = reloaded.load().unwrap();
    assert_eq!(settings.reminders.meeting_lead_minutes, 30);
}

#[test]
fn test_set_optional_timeout() {
    let (mut engine, _path, _tmp) = setup();
    engine.load().unwrap();
    engine
        .set_value("service.request_timeout_secs", json!(15))
        .unwrap();
    assert_eq!(engine.get_settings().service.request_timeout_secs, Some(15));
}

#[test]
fn test_set_value_unknown_key_is_rejected() {
    let (mut engine, _path, _tmp) = setup();
    engine.load().unwrap();
    assert!(engine.set_value("reminders.lunch_lead_minutes", json!(5)).is_err());
    assert!(engine.set_value("", json!(5)).is_err());
}

#[test]
fn test_set_value_wrong_type_leaves_settings_untouched() {
    let (mut engine, _path, _tmp) = setup();
    engine.load().unwrap();
    let result = engine.set_value("chat.max_transcript_messages", json!("lots"));
    assert!(result.is_err());
    assert_eq!(engine.get_settings().chat.max_transcript_messages, 200);
}

#[test]
fn test_out_of_range_lead_time_is_rejected_and_not_saved() {
    let (mut engine, path, _tmp) = setup();
    engine.load().unwrap();
    let err = engine
        .set_value("reminders.event_lead_minutes", json!(i64::MAX))
        .unwrap_err();
    assert!(matches!(err, SettingsError::InvalidValue(_)));
    assert!(engine.set_value("reminders.other_lead_minutes", json!(-1)).is_err());
    assert!(!path.exists());

    // the engine still yields a usable policy
    let policy = engine.effective().reminders.policy();
    assert_eq!(policy.event.num_minutes(), 24 * 60);
}

#[test]
fn test_out_of_range_offset_is_rejected() {
    let (mut engine, _path, _tmp) = setup();
    engine.load().unwrap();
    let result = engine.set_value("reminders.naive_utc_offset_minutes", json!(i32::MAX));
    assert!(matches!(result, Err(SettingsError::InvalidValue(_))));
    assert_eq!(engine.get_settings().reminders.naive_utc_offset_minutes, 0);
}

#[test]
fn test_hand_edited_out_of_range_file_is_an_error() {
    let (mut engine, path, _tmp) = setup();
    fs::write(
        &path,
        r#"{"reminders":{"event_lead_minutes":9223372036854775807,"assignment_lead_minutes":240,"meeting_lead_minutes":20,"other_lead_minutes":60}}"#,
    )
    .unwrap();
    assert!(matches!(engine.load(), Err(SettingsError::InvalidValue(_))));
    assert_eq!(engine.get_settings(), &AgentSettings::default());
}

#[test]
fn test_reset_restores_defaults() {
    let (mut engine, _path, _tmp) = setup();
    engine.load().unwrap();
    engine
        .set_value("service.base_url", json!("https://summaries.example"))
        .unwrap();
    engine.reset().unwrap();
    assert_eq!(*engine.get_settings(), AgentSettings::default());
}

#[test]
fn test_malformed_file_is_an_error() {
    let (mut engine, path, _tmp) = setup();
    fs::write(&path, "{ not json").unwrap();
    assert!(engine.load().is_err());
}

#[test]
fn test_api_base_override_is_not_persisted() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("settings.json");
    let mut engine = SettingsEngine::new(Some(path.clone()))
        .with_api_base_override(Some("http://127.0.0.1:9999".to_string()));
    let effective = engine.load().unwrap();
    assert_eq!(effective.service.base_url, "http://127.0.0.1:9999");

    engine.set_value("chat.max_transcript_messages", json!(50)).unwrap();
    let on_disk: AgentSettings = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk.service.base_url, DEFAULT_API_BASE);
    assert_eq!(on_disk.chat.max_transcript_messages, 50);
}
