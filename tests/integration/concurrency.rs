//! Readers racing writers always observe a whole snapshot

use amalgam::{compute_digest, ConfigState, PluginRegistry, SourceDocument};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

#[test]
fn test_readers_see_coherent_snapshots() {
    let state = Arc::new(ConfigState::from_registry(PluginRegistry::new()));
    state
        .update(vec![SourceDocument::new("seed", r#"{"counter": {"a": 0, "b": 0}}"#)])
        .unwrap();
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let state = Arc::clone(&state);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut observed = 0u64;
                while !done.load(Ordering::SeqCst) {
                    let snapshot = state.snapshot().unwrap();
                    assert_eq!(compute_digest(&snapshot.tree).unwrap(), snapshot.digest);
                    // Both keys are written by the same update.
                    let a = snapshot.tree.get("counter.a", -1i64);
                    let b = snapshot.tree.get("counter.b", -2i64);
                    assert_eq!(a, b);
                    observed += 1;
                }
                observed
            })
        })
        .collect();

    let writers: Vec<_> = (0..2)
        .map(|w| {
            let state = Arc::clone(&state);
            thread::spawn(move || {
                for i in 1..=100i64 {
                    let n = i * 10 + w;
                    state
                        .update(vec![SourceDocument::new(
                            format!("w{}", w),
                            format!(r#"{{"counter": {{"a": {n}, "b": {n}}}}}"#, n = n),
                        )])
                        .unwrap();
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }
    done.store(true, Ordering::SeqCst);
    for reader in readers {
        reader.join().unwrap();
    }

    let last = state.snapshot().unwrap();
    assert_eq!(compute_digest(&last.tree).unwrap(), last.digest);
    assert!(last.generation > 1);
}
