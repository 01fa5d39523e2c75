//! Plugin dispatch and the filesystem plugin

use super::test_utils::{fixture_body, state_with_plugin};
use amalgam::plugin::{action_request, GEN_CONFIG_ACTION};
use amalgam::{ConfigError, FilesystemConfigPlugin, PluginRegistry, StaticConfigPlugin};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_call_routes_to_registered_plugin() {
    let mut registry = PluginRegistry::new();
    registry.add(
        "test_plugin",
        Arc::new(StaticConfigPlugin::single("data", "foobar")),
    );
    registry.set_active("test_plugin").unwrap();

    let response = registry.call(&action_request(GEN_CONFIG_ACTION)).unwrap();
    assert_eq!(response.len(), 1);
    assert_eq!(response[0]["data"], "foobar");

    let named = registry
        .call_plugin("test_plugin", &action_request(GEN_CONFIG_ACTION))
        .unwrap();
    assert_eq!(named, response);
}

#[test]
fn test_unknown_action_and_plugin() {
    let mut registry = PluginRegistry::new();
    registry.add("test_plugin", Arc::new(StaticConfigPlugin::default()));
    registry.set_active("test_plugin").unwrap();

    assert!(matches!(
        registry.call(&action_request("explode")),
        Err(ConfigError::UnknownAction { .. })
    ));
    assert!(matches!(
        registry.call_plugin("absent", &action_request(GEN_CONFIG_ACTION)),
        Err(ConfigError::PluginNotFound(_))
    ));
    assert!(matches!(
        registry.set_active("absent"),
        Err(ConfigError::PluginNotFound(_))
    ));
}

#[test]
fn test_filesystem_directory_load() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("10-base.conf"), fixture_body("test.config")).unwrap();
    fs::write(
        temp_dir.path().join("20-local.conf"),
        r#"{"options": {"verbose": true}}"#,
    )
    .unwrap();

    let state = state_with_plugin(Arc::new(FilesystemConfigPlugin::new(temp_dir.path())));
    let report = state.load().unwrap();

    assert_eq!(report.applied, vec!["10-base.conf", "20-local.conf"]);
    assert!(state.get("options.verbose", false));
    assert_eq!(state.scheduled_queries().len(), 2);
}

#[test]
fn test_switching_active_plugin_then_refresh() {
    let state = state_with_plugin(Arc::new(StaticConfigPlugin::single(
        "base",
        r#"{"options": {"a": 1}}"#,
    )));
    state.load().unwrap();

    {
        let plugins = state.plugins();
        let mut registry = plugins.write();
        registry.add(
            "second",
            Arc::new(StaticConfigPlugin::single("extra", r#"{"options": {"b": 2}}"#)),
        );
        registry.set_active("second").unwrap();
    }

    let report = state.refresh().unwrap();
    assert!(report.changed);
    assert_eq!(report.applied, vec!["extra"]);
    assert_eq!(state.get("options.a", 0), 0);
    assert_eq!(state.get("options.b", 0), 2);
}

#[test]
fn test_refresh_drops_query_removed_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("agent.conf");
    fs::write(
        &file,
        r#"{"schedule": {
            "a": {"query": "select 1", "interval": 10},
            "b": {"query": "select 2", "interval": 10}
        }}"#,
    )
    .unwrap();

    let state = state_with_plugin(Arc::new(FilesystemConfigPlugin::new(&file)));
    state.load().unwrap();
    assert_eq!(state.scheduled_queries().len(), 2);
    let before = state.md5().unwrap();

    fs::write(
        &file,
        r#"{"schedule": {"a": {"query": "select 1", "interval": 10}}}"#,
    )
    .unwrap();
    let report = state.refresh().unwrap();

    assert!(report.changed);
    let queries = state.scheduled_queries();
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].name, "a");
    assert_ne!(state.md5().unwrap(), before);

    // Unchanged file: nothing republished.
    let again = state.refresh().unwrap();
    assert!(!again.changed);
    assert_eq!(again.generation, report.generation);
}
