//! Property-based tests for reminder settings.
//!
//! Lead times written through `set_value` survive a reload and come out of
//! `ReminderSettings::policy` as exactly that many minutes per type.

use pagekeeper::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use pagekeeper::types::bookmark::DeadlineType;
use proptest::prelude::*;
use serde_json::json;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn lead_minutes_survive_reload_and_drive_policy(
        event in 0i64..10_000,
        assignment in 0i64..10_000,
        meeting in 0i64..10_000,
        other in 0i64..10_000,
    ) {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("settings.json");
        let mut engine = SettingsEngine::new(Some(path.clone())).with_api_base_override(None);
        engine.load().unwrap();
        engine.set_value("reminders.event_lead_minutes", json!(event)).unwrap();
        engine.set_value("reminders.assignment_lead_minutes", json!(assignment)).unwrap();
        engine.set_value("reminders.meeting_lead_minutes", json!(meeting)).unwrap();
        engine.set_value("reminders.other_lead_minutes", json!(other)).unwrap();

        let mut reloaded = SettingsEngine::new(Some(path)).with_api_base_override(None);
        let policy = reloaded.load().unwrap().reminders.policy();
        prop_assert_eq!(policy.lead_time(DeadlineType::Event).num_minutes(), event);
        prop_assert_eq!(policy.lead_time(DeadlineType::Assignment).num_minutes(), assignment);
        prop_assert_eq!(policy.lead_time(DeadlineType::Meeting).num_minutes(), meeting);
        prop_assert_eq!(policy.lead_time(DeadlineType::Other).num_minutes(), other);
    }
}
