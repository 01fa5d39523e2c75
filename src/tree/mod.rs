//! Configuration Tree
//!
//! A key-ordered tree of scalars, lists and nested maps. Map keys are kept
//! sorted (`serde_json::Map` is a `BTreeMap` here), so the serialized form of a
//! tree depends only on its content, never on the order sources arrived in.

pub mod path;

use crate::error::ConfigError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The amalgamated configuration tree
///
/// The root is always a map. Trees are replaced as a whole by the merge engine;
/// nothing outside it mutates nodes in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct ConfigTree {
    root: Value,
}

impl ConfigTree {
    /// An empty tree (`{}`)
    pub fn empty() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }

    /// Wrap a map as a tree
    pub fn from_map(map: Map<String, Value>) -> Self {
        Self {
            root: Value::Object(map),
        }
    }

    /// Wrap a value as a tree, rejecting non-map roots
    pub fn from_value(value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(ConfigError::DocumentParse {
                id: "<tree>".to_string(),
                message: format!("root must be a map, found {}", kind_of(&other)),
            }),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.as_map().is_empty()
    }

    pub fn as_value(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    /// Top-level map of the tree
    pub fn as_map(&self) -> &Map<String, Value> {
        match &self.root {
            Value::Object(map) => map,
            _ => unreachable!("ConfigTree root is always a map"),
        }
    }

    pub(crate) fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        match &mut self.root {
            Value::Object(map) => map,
            _ => unreachable!("ConfigTree root is always a map"),
        }
    }

    /// Look up the node at a dotted path
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        path::resolve(&self.root, path)
    }

    /// Typed lookup; `None` when the path is absent or the node has another type
    pub fn try_get<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        self.lookup(path)
            .and_then(|node| T::deserialize(node).ok())
    }

    /// Typed lookup with a fallback for absent or mismatched nodes
    ///
    /// ```
    /// # use amalgam::tree::ConfigTree;
    /// let tree = ConfigTree::from_value(serde_json::json!({"options": {"new1": "value"}})).unwrap();
    /// assert_eq!(tree.get("options.new1", String::new()), "value");
    /// assert_eq!(tree.get("options.missing", 7u64), 7);
    /// ```
    pub fn get<T: DeserializeOwned>(&self, path: &str, default: T) -> T {
        self.try_get(path).unwrap_or(default)
    }
}

impl Default for ConfigTree {
    fn default() -> Self {
        Self::empty()
    }
}

impl TryFrom<Value> for ConfigTree {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<ConfigTree> for Value {
    fn from(tree: ConfigTree) -> Self {
        tree.root
    }
}

impl std::fmt::Display for ConfigTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match serde_json::to_string_pretty(&self.root) {
            Ok(text) => f.write_str(&text),
            Err(_) => Err(std::fmt::Error),
        }
    }
}

/// Short name of a node's type, for messages
pub fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}
