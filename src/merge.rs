//! Merge Engine
//!
//! Folds an ordered batch of source documents into an existing tree.
//!
//! Rules:
//! - documents are applied in ascending id order, whatever order they arrived in;
//!   a later id overwrites an earlier one at the same leaf path
//! - maps merge key by key, recursively; keys present on one side only survive
//! - scalars and lists are leaves: a later leaf replaces the earlier one whole
//!   (lists are never concatenated)
//! - a document that fails to parse is dropped with a warning; the rest of the
//!   batch still applies

use crate::error::{ConfigError, ConfigWarning};
use crate::source::SourceDocument;
use crate::tree::ConfigTree;
use serde_json::map::Entry;
use serde_json::{Map, Value};
use std::time::Instant;
use tracing::{debug, trace, warn};

/// Result of one merge pass
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// The merged tree
    pub tree: ConfigTree,
    /// Ids of the documents that were folded in, in application order
    pub applied: Vec<String>,
    /// Documents dropped because they did not parse
    pub warnings: Vec<ConfigWarning>,
}

/// Merge `updates` on top of `existing`
///
/// `existing` is left untouched; the result is a new tree. An empty batch
/// yields a tree equal to `existing`.
pub fn merge(existing: &ConfigTree, mut updates: Vec<SourceDocument>) -> MergeOutcome {
    let start = Instant::now();

    // Stable sort: two documents sharing an id keep their input order, so the
    // later one wins.
    updates.sort_by(|a, b| a.id.cmp(&b.id));

    let mut tree = existing.clone();
    let mut applied = Vec::with_capacity(updates.len());
    let mut warnings = Vec::new();

    for document in updates {
        match document.parse() {
            Ok(map) => {
                trace!(source = %document.id, keys = map.len(), "Folding source");
                merge_map(tree.as_map_mut(), map);
                applied.push(document.id);
            }
            Err(e) => {
                warn!(source = %document.id, error = %e, "Dropping unparseable config source");
                let message = match e {
                    ConfigError::DocumentParse { message, .. } => message,
                    other => other.to_string(),
                };
                warnings.push(ConfigWarning::DocumentParse {
                    id: document.id,
                    message,
                });
            }
        }
    }

    debug!(
        applied = applied.len(),
        dropped = warnings.len(),
        duration_us = start.elapsed().as_micros() as u64,
        "Merge pass completed"
    );

    MergeOutcome {
        tree,
        applied,
        warnings,
    }
}

/// Fold `overlay` into `base` key by key
fn merge_map(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, incoming) in overlay {
        match base.entry(key) {
            Entry::Occupied(mut slot) => merge_value(slot.get_mut(), incoming),
            Entry::Vacant(slot) => {
                slot.insert(incoming);
            }
        }
    }
}

/// Merge one node: map into map recurses, anything else replaces
fn merge_value(base: &mut Value, incoming: Value) {
    match (base, incoming) {
        (Value::Object(base_map), Value::Object(incoming_map)) => {
            merge_map(base_map, incoming_map);
        }
        (slot, incoming) => *slot = incoming,
    }
}
