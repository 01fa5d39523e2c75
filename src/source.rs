//! Source documents: raw config text handed in by a provider or an update trigger

use crate::error::ConfigError;
use crate::tree::kind_of;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Source identifier to raw body, as produced by a config plugin
pub type SourceMap = BTreeMap<String, String>;

/// One named, unparsed configuration document
///
/// The id is unique within an update batch; it also decides precedence, since
/// documents are folded in ascending id order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    pub id: String,
    pub body: String,
}

impl SourceDocument {
    pub fn new(id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: body.into(),
        }
    }

    /// Parse the body into a top-level map
    pub fn parse(&self) -> Result<Map<String, Value>, ConfigError> {
        let value: Value =
            serde_json::from_str(&self.body).map_err(|e| ConfigError::DocumentParse {
                id: self.id.clone(),
                message: e.to_string(),
            })?;

        match value {
            Value::Object(map) => Ok(map),
            other => Err(ConfigError::DocumentParse {
                id: self.id.clone(),
                message: format!("top level must be a map, found {}", kind_of(&other)),
            }),
        }
    }
}

impl<I: Into<String>, B: Into<String>> From<(I, B)> for SourceDocument {
    fn from((id, body): (I, B)) -> Self {
        Self::new(id, body)
    }
}

/// Turn a provider's source map into documents
pub fn documents_from_map(sources: SourceMap) -> Vec<SourceDocument> {
    sources
        .into_iter()
        .map(|(id, body)| SourceDocument { id, body })
        .collect()
}
