//! Watched-file view: `file_paths` categories for file-integrity monitoring

use super::Extracted;
use crate::error::ConfigWarning;
use crate::tree::{kind_of, ConfigTree};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

pub const FILE_PATHS_KEY: &str = "file_paths";

const VIEW: &str = "file_paths";

/// Category name to the set of path patterns watched under it
pub type WatchedFiles = BTreeMap<String, BTreeSet<String>>;

/// Project the watched-file categories out of a tree
pub fn extract_watched_files(tree: &ConfigTree) -> Extracted<WatchedFiles> {
    let mut files = WatchedFiles::new();
    let mut warnings = Vec::new();

    let categories = match tree.lookup(FILE_PATHS_KEY) {
        None => return Extracted::default(),
        Some(Value::Object(categories)) => categories,
        Some(other) => {
            warnings.push(drop_entry(
                FILE_PATHS_KEY,
                format!("must be a map, found {}", kind_of(other)),
            ));
            return Extracted {
                value: files,
                warnings,
            };
        }
    };

    for (category, patterns) in categories {
        let Some(patterns) = patterns.as_array() else {
            warnings.push(drop_entry(
                category,
                format!("patterns must be a list, found {}", kind_of(patterns)),
            ));
            continue;
        };

        let mut set = BTreeSet::new();
        for (index, pattern) in patterns.iter().enumerate() {
            match pattern.as_str() {
                Some(p) if !p.is_empty() => {
                    set.insert(p.to_string());
                }
                _ => warnings.push(drop_entry(
                    &format!("{}[{}]", category, index),
                    "pattern must be a non-empty string",
                )),
            }
        }

        if set.is_empty() {
            if !patterns.is_empty() {
                warnings.push(drop_entry(category, "no valid patterns"));
            }
            continue;
        }
        files.insert(category.clone(), set);
    }

    Extracted {
        value: files,
        warnings,
    }
}

fn drop_entry(entry: &str, message: impl Into<String>) -> ConfigWarning {
    let warning = ConfigWarning::extraction(VIEW, entry, message);
    warn!(%warning, "Skipping malformed file_paths entry");
    warning
}
