//! View extraction over loaded state

use super::test_utils::{doc, state_with_plugin};
use amalgam::{ConfigWarning, PluginRegistry, ConfigState, StaticConfigPlugin};
use std::sync::Arc;

#[test]
fn test_no_schedule_gives_empty_views() {
    let state = state_with_plugin(Arc::new(StaticConfigPlugin::single(
        "base",
        r#"{"options": {"verbose": true}}"#,
    )));
    let report = state.load().unwrap();
    assert!(report.warnings.is_empty());
    assert!(state.scheduled_queries().is_empty());
    assert!(state.watched_files().is_empty());
}

#[test]
fn test_malformed_query_is_skipped() {
    let state = ConfigState::from_registry(PluginRegistry::new());
    let report = state
        .update(vec![doc(
            "base",
            r#"{"schedule": {
                "good": {"query": "select 1", "interval": 60},
                "bad": {"interval": 60}
            }}"#,
        )])
        .unwrap();

    let queries = state.scheduled_queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].name, "good");
    assert!(report
        .warnings
        .iter()
        .any(|w| matches!(w, ConfigWarning::Extraction { entry, .. } if entry == "bad")));
    assert_eq!(state.snapshot().unwrap().warnings, report.warnings);
}

#[test]
fn test_legacy_list_and_map_forms_combine() {
    let state = ConfigState::from_registry(PluginRegistry::new());
    state
        .update(vec![doc(
            "base",
            r#"{
                "scheduledQueries": [
                    {"name": "shared", "query": "select 'legacy'", "interval": 5},
                    {"name": "old_only", "query": "select 2", "interval": 5}
                ],
                "schedule": {"shared": {"query": "select 'map'", "interval": 5}}
            }"#,
        )])
        .unwrap();

    let queries = state.scheduled_queries();
    let names: Vec<&str> = queries.iter().map(|q| q.name.as_str()).collect();
    assert_eq!(names, vec!["old_only", "shared"]);
    assert_eq!(queries[1].query, "select 'map'");
}
