//! Updates composing on top of a loaded configuration

use super::test_utils::{doc, loaded_fixture_state};

#[test]
fn test_fixture_views() {
    let state = loaded_fixture_state();

    let files = state.watched_files();
    assert_eq!(files.len(), 2);
    assert_eq!(files["downloads"].len(), 1);
    assert_eq!(files["system_binaries"].len(), 2);

    let queries = state.scheduled_queries();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0].name, "process_audit");
    assert_eq!(queries[0].interval, 300);
    assert_eq!(queries[0].options["platform"], "linux");
    assert_eq!(queries[1].name, "time_looper");
}

#[test]
fn test_updates_compose_and_change_digest() {
    let state = loaded_fixture_state();
    let initial = state.md5().unwrap();
    assert_eq!(initial.len(), 32);

    state
        .update(vec![doc("1new_source", r#"{"options": {"new1": "value"}}"#)])
        .unwrap();
    assert_eq!(state.get("options.new1", String::new()), "value");
    let after_first = state.md5().unwrap();
    assert_ne!(after_first, initial);

    state
        .update(vec![doc("2new_source", r#"{"options": {"new1": "changed"}}"#)])
        .unwrap();
    assert_eq!(state.get("options.new1", String::new()), "changed");
    let after_second = state.md5().unwrap();
    assert_ne!(after_second, after_first);

    state
        .update(vec![doc("3new_source", r#"{"options": {"new2": "different"}}"#)])
        .unwrap();
    assert_eq!(state.get("options.new1", String::new()), "changed");
    assert_eq!(state.get("options.new2", String::new()), "different");
    assert_ne!(state.md5().unwrap(), after_second);

    // Siblings from the base config survive every update.
    assert_eq!(state.get("options.config_refresh", 0u64), 60);
    assert_eq!(state.scheduled_queries().len(), 2);
}

#[test]
fn test_empty_and_identical_updates_keep_digest() {
    let state = loaded_fixture_state();
    let before = state.md5().unwrap();
    let generation = state.snapshot().unwrap().generation;

    let empty = state.update(Vec::new()).unwrap();
    assert!(!empty.changed);
    assert_eq!(state.md5().unwrap(), before);

    let same = state
        .update(vec![doc("again", r#"{"options": {"verbose": false}}"#)])
        .unwrap();
    assert!(!same.changed);
    assert_eq!(same.generation, generation);
    assert_eq!(state.md5().unwrap(), before);
}

#[test]
fn test_update_can_redefine_a_query() {
    let state = loaded_fixture_state();
    state
        .update(vec![doc(
            "tune",
            r#"{"schedule": {"time_looper": {"query": "select 1", "interval": 10}}}"#,
        )])
        .unwrap();

    let queries = state.scheduled_queries();
    assert_eq!(queries.len(), 2);
    let looper = queries.iter().find(|q| q.name == "time_looper").unwrap();
    assert_eq!(looper.query, "select 1");
    assert_eq!(looper.interval, 10);
}
