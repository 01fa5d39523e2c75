//! Scheduled-query view
//!
//! Reads the `schedule` subtree (`name -> {query, interval, ...}`) and the
//! older list form `scheduledQueries` (`[{name, query, interval}]`). A name in
//! `schedule` wins over the same name in the list.

use super::Extracted;
use crate::error::ConfigWarning;
use crate::tree::{kind_of, ConfigTree};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

/// Key of the map-form schedule subtree
pub const SCHEDULE_KEY: &str = "schedule";
/// Key of the list-form schedule subtree
pub const LEGACY_SCHEDULE_KEY: &str = "scheduledQueries";

const VIEW: &str = "schedule";

/// A query the scheduler should run periodically
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledQuery {
    pub name: String,
    pub query: String,
    /// Seconds between runs, always positive
    pub interval: u64,
    /// Every other key of the entry (`platform`, `snapshot`, ...)
    #[serde(default)]
    pub options: BTreeMap<String, Value>,
}

/// Project the schedule out of a tree, sorted by name
pub fn extract_schedule(tree: &ConfigTree) -> Extracted<Vec<ScheduledQuery>> {
    let mut queries: BTreeMap<String, ScheduledQuery> = BTreeMap::new();
    let mut warnings = Vec::new();

    match tree.lookup(LEGACY_SCHEDULE_KEY) {
        None => {}
        Some(Value::Array(entries)) => {
            for (index, entry) in entries.iter().enumerate() {
                let label = entry
                    .get("name")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("{}[{}]", LEGACY_SCHEDULE_KEY, index));
                let Some(fields) = entry.as_object() else {
                    warnings.push(drop_entry(
                        &label,
                        format!("entry must be a map, found {}", kind_of(entry)),
                    ));
                    continue;
                };
                let mut fields = fields.clone();
                let name = match fields.remove("name") {
                    Some(Value::String(name)) if !name.is_empty() => name,
                    _ => {
                        warnings.push(drop_entry(&label, "missing string 'name'"));
                        continue;
                    }
                };
                match parse_entry(name, fields) {
                    Ok(query) => {
                        queries.insert(query.name.clone(), query);
                    }
                    Err(message) => warnings.push(drop_entry(&label, message)),
                }
            }
        }
        Some(other) => warnings.push(drop_entry(
            LEGACY_SCHEDULE_KEY,
            format!("must be a list, found {}", kind_of(other)),
        )),
    }

    match tree.lookup(SCHEDULE_KEY) {
        None => {}
        Some(Value::Object(entries)) => {
            for (name, entry) in entries {
                let Some(fields) = entry.as_object() else {
                    warnings.push(drop_entry(
                        name,
                        format!("entry must be a map, found {}", kind_of(entry)),
                    ));
                    continue;
                };
                match parse_entry(name.clone(), fields.clone()) {
                    Ok(query) => {
                        queries.insert(query.name.clone(), query);
                    }
                    Err(message) => warnings.push(drop_entry(name, message)),
                }
            }
        }
        Some(other) => warnings.push(drop_entry(
            SCHEDULE_KEY,
            format!("must be a map, found {}", kind_of(other)),
        )),
    }

    Extracted {
        value: queries.into_values().collect(),
        warnings,
    }
}

fn parse_entry(name: String, mut fields: Map<String, Value>) -> Result<ScheduledQuery, String> {
    let query = match fields.remove("query") {
        Some(Value::String(query)) if !query.trim().is_empty() => query,
        Some(Value::String(_)) => return Err("'query' is empty".to_string()),
        Some(other) => return Err(format!("'query' must be a string, found {}", kind_of(&other))),
        None => return Err("missing 'query'".to_string()),
    };

    let interval = match fields.remove("interval") {
        Some(value) => parse_interval(&value)?,
        None => return Err("missing 'interval'".to_string()),
    };

    Ok(ScheduledQuery {
        name,
        query,
        interval,
        options: fields.into_iter().collect(),
    })
}

/// Intervals are positive integer seconds; numeric strings are accepted
fn parse_interval(value: &Value) -> Result<u64, String> {
    let interval = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    match interval {
        Some(0) => Err("'interval' must be positive".to_string()),
        Some(seconds) => Ok(seconds),
        None => Err(format!("'interval' must be a positive integer, found {}", value)),
    }
}

fn drop_entry(entry: &str, message: impl Into<String>) -> ConfigWarning {
    let warning = ConfigWarning::extraction(VIEW, entry, message);
    warn!(%warning, "Skipping malformed schedule entry");
    warning
}
