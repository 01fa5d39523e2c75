//! Error and warning types for configuration amalgamation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that fail a whole `load`/`update`/accessor call
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Config plugin not registered: {0}")]
    PluginNotFound(String),

    #[error("Config plugin '{plugin}' does not support action '{action}'")]
    UnknownAction { plugin: String, action: String },

    #[error("Source '{id}' is not a valid config document: {message}")]
    DocumentParse { id: String, message: String },

    #[error("Digest computation failed: {0}")]
    Digest(String),

    #[error("Configuration has not been loaded")]
    Uninitialized,

    #[error("No configuration value at '{0}'")]
    PathNotFound(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("JSON encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::Settings(err.to_string())
    }
}

/// Non-fatal problems recorded while merging or extracting
///
/// A warning never aborts the pass that produced it; the offending document or
/// entry is dropped and processing continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigWarning {
    /// A source body could not be parsed and was left out of the merge
    DocumentParse { id: String, message: String },

    /// A schedule or watch entry was malformed and left out of its view
    Extraction {
        view: String,
        entry: String,
        message: String,
    },
}

impl ConfigWarning {
    pub fn extraction(view: &str, entry: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigWarning::Extraction {
            view: view.to_string(),
            entry: entry.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigWarning::DocumentParse { id, message } => {
                write!(f, "source '{}' dropped: {}", id, message)
            }
            ConfigWarning::Extraction {
                view,
                entry,
                message,
            } => write!(f, "{} entry '{}' dropped: {}", view, entry, message),
        }
    }
}
