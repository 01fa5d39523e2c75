//! One bad document never costs the rest of a batch

use super::test_utils::{doc, state_with_plugin};
use amalgam::{ConfigError, ConfigState, ConfigWarning, PluginRegistry, StaticConfigPlugin};
use std::collections::BTreeMap;
use std::sync::Arc;

#[test]
fn test_malformed_document_dropped_with_warning() {
    let mut sources = BTreeMap::new();
    sources.insert("1-broken".to_string(), "{not json".to_string());
    sources.insert("2-good".to_string(), r#"{"options": {"ok": true}}"#.to_string());
    let state = state_with_plugin(Arc::new(StaticConfigPlugin::new(sources)));

    let report = state.load().unwrap();
    assert!(report.changed);
    assert_eq!(report.applied, vec!["2-good"]);
    assert_eq!(report.warnings.len(), 1);
    assert!(matches!(
        &report.warnings[0],
        ConfigWarning::DocumentParse { id, .. } if id == "1-broken"
    ));
    assert!(state.get("options.ok", false));
}

#[test]
fn test_non_map_document_dropped() {
    let state = ConfigState::from_registry(PluginRegistry::new());
    let report = state
        .update(vec![doc("list", "[1, 2, 3]"), doc("map", r#"{"k": 1}"#)])
        .unwrap();
    assert_eq!(report.applied, vec!["map"]);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(state.get("k", 0), 1);
}

#[test]
fn test_load_without_active_plugin_fails() {
    let state = ConfigState::from_registry(PluginRegistry::new());
    assert!(matches!(
        state.load(),
        Err(ConfigError::ProviderUnavailable(_))
    ));
    assert!(matches!(state.md5(), Err(ConfigError::Uninitialized)));
}
