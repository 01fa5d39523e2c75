//! Amalgam: Configuration Amalgamation for Host Agents
//!
//! Merges configuration documents from pluggable sources into one
//! deterministic tree, fingerprints it with an MD5 digest for change
//! detection, and projects the scheduled queries and watched-file categories
//! that the rest of an agent consumes.
//!
//! ```no_run
//! use amalgam::{ConfigState, PluginRegistry, FilesystemConfigPlugin};
//! use std::sync::Arc;
//!
//! let mut registry = PluginRegistry::new();
//! registry.add("filesystem", Arc::new(FilesystemConfigPlugin::new("/etc/amalgam/amalgam.conf")));
//! registry.set_active("filesystem")?;
//!
//! let state = ConfigState::from_registry(registry);
//! state.load()?;
//! println!("{}", state.md5()?);
//! # Ok::<(), amalgam::ConfigError>(())
//! ```

pub mod cli;
pub mod digest;
pub mod error;
pub mod logging;
pub mod merge;
pub mod plugin;
pub mod refresh;
pub mod settings;
pub mod source;
pub mod state;
pub mod tree;
pub mod views;

pub use digest::{compute_digest, Digest};
pub use error::{ConfigError, ConfigWarning};
pub use merge::{merge, MergeOutcome};
pub use plugin::{ConfigPlugin, FilesystemConfigPlugin, PluginRegistry, StaticConfigPlugin};
pub use source::{SourceDocument, SourceMap};
pub use state::{ConfigState, Lifecycle, Snapshot, UpdateReport};
pub use tree::ConfigTree;
pub use views::{ScheduledQuery, WatchedFiles};
