//! Config State
//!
//! Holder of the live amalgamated configuration. Each merge pass builds a
//! complete [`Snapshot`] (tree, digest and views) off to the side and publishes
//! it with one atomic pointer swap:
//!
//! ```text
//! load / update / refresh
//!     → writer lock (one pass commits at a time)
//!     → merge onto the published tree (or {} for load)
//!     → digest; unchanged digest stops here, nothing is republished
//!     → extract schedule + watched files
//!     → swap Arc<Snapshot> into the slot
//! ```
//!
//! Readers load the current `Arc<Snapshot>` without touching the writer lock,
//! so they never wait on a pass in progress and never see half of one.

use crate::digest::{compute_digest, Digest};
use crate::error::{ConfigError, ConfigWarning};
use crate::merge::merge;
use crate::plugin::PluginRegistry;
use crate::source::{documents_from_map, SourceDocument};
use crate::tree::ConfigTree;
use crate::views::{extract_schedule, extract_watched_files, ScheduledQuery, WatchedFiles};
use arc_swap::ArcSwapOption;
use parking_lot::{Mutex, RwLock};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// One published, internally consistent configuration state
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub tree: ConfigTree,
    pub digest: Digest,
    pub schedule: Vec<ScheduledQuery>,
    pub watched_files: WatchedFiles,
    /// Warnings raised by the pass that produced this snapshot
    pub warnings: Vec<ConfigWarning>,
    /// 1 for the first publish, +1 for each later one
    pub generation: u64,
}

/// Outcome of a `load`, `update` or `refresh` call
#[derive(Debug, Clone, Serialize)]
pub struct UpdateReport {
    /// Whether a new snapshot was published
    pub changed: bool,
    /// Digest of the state after the call
    pub digest: Digest,
    /// Generation of the published snapshot after the call (0 if none)
    pub generation: u64,
    /// Source ids folded in, in application order
    pub applied: Vec<String>,
    /// Documents dropped by this pass plus entries missing from the views,
    /// whether or not a new snapshot was published
    pub warnings: Vec<ConfigWarning>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Lifecycle {
    Uninitialized,
    Loaded,
}

/// Where a merge pass starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Base {
    Empty,
    Published,
}

/// Shared configuration state; wrap in `Arc` and hand to every subsystem
pub struct ConfigState {
    plugins: Arc<RwLock<PluginRegistry>>,
    published: ArcSwapOption<Snapshot>,
    writer: Mutex<()>,
}

impl ConfigState {
    pub fn new(plugins: Arc<RwLock<PluginRegistry>>) -> Self {
        Self {
            plugins,
            published: ArcSwapOption::empty(),
            writer: Mutex::new(()),
        }
    }

    pub fn from_registry(registry: PluginRegistry) -> Self {
        Self::new(Arc::new(RwLock::new(registry)))
    }

    /// The plugin registry, for switching the active plugin at runtime
    pub fn plugins(&self) -> Arc<RwLock<PluginRegistry>> {
        Arc::clone(&self.plugins)
    }

    /// Build the configuration from scratch out of the active plugin's sources
    ///
    /// A failing plugin call fails the load and leaves the state as it was.
    /// Unparseable sources are dropped and reported in the returned warnings.
    #[instrument(skip(self))]
    pub fn load(&self) -> Result<UpdateReport, ConfigError> {
        let sources = self.fetch_sources().map_err(|e| {
            warn!(error = %e, "Config load failed; state unchanged");
            e
        })?;
        self.apply(documents_from_map(sources), Base::Empty)
    }

    /// Merge `sources` on top of the published configuration
    #[instrument(skip(self, sources), fields(sources = sources.len()))]
    pub fn update(&self, sources: Vec<SourceDocument>) -> Result<UpdateReport, ConfigError> {
        if sources.is_empty() {
            debug!("Empty update; nothing to merge");
            return self.unchanged_report();
        }
        self.apply(sources, Base::Published)
    }

    /// Rebuild from the active plugin's current sources
    ///
    /// Like `load`, the result starts from `{}`, so entries removed from the
    /// provider leave the live configuration. Content merged by earlier
    /// `update` calls is not carried over. A failing plugin call keeps the
    /// published snapshot.
    #[instrument(skip(self))]
    pub fn refresh(&self) -> Result<UpdateReport, ConfigError> {
        let sources = self.fetch_sources()?;
        self.apply(documents_from_map(sources), Base::Empty)
    }

    fn fetch_sources(&self) -> Result<crate::source::SourceMap, ConfigError> {
        let plugins = self.plugins.read();
        plugins.gen_config()
    }

    fn apply(&self, sources: Vec<SourceDocument>, base: Base) -> Result<UpdateReport, ConfigError> {
        let start = Instant::now();
        let _writer = self.writer.lock();

        let current = self.published.load_full();
        let empty = ConfigTree::empty();
        let base_tree = match (base, current.as_deref()) {
            (Base::Published, Some(snapshot)) => &snapshot.tree,
            _ => &empty,
        };

        let outcome = merge(base_tree, sources);
        let digest = compute_digest(&outcome.tree).map_err(|e| {
            warn!(error = %e, "Digest computation failed; keeping previous snapshot");
            e
        })?;

        if let Some(snapshot) = current.as_deref() {
            if snapshot.digest == digest {
                debug!(digest = %digest, "Merged config identical to published state");
                // Same tree, so the published views carry the same extraction warnings.
                let mut warnings = outcome.warnings;
                warnings.extend(
                    snapshot
                        .warnings
                        .iter()
                        .filter(|w| matches!(w, ConfigWarning::Extraction { .. }))
                        .cloned(),
                );
                return Ok(UpdateReport {
                    changed: false,
                    digest,
                    generation: snapshot.generation,
                    applied: outcome.applied,
                    warnings,
                });
            }
        }

        let schedule = extract_schedule(&outcome.tree);
        let watched_files = extract_watched_files(&outcome.tree);

        let mut warnings = outcome.warnings;
        warnings.extend(schedule.warnings);
        warnings.extend(watched_files.warnings);

        let generation = current.as_deref().map_or(1, |s| s.generation + 1);
        let snapshot = Snapshot {
            tree: outcome.tree,
            digest,
            schedule: schedule.value,
            watched_files: watched_files.value,
            warnings: warnings.clone(),
            generation,
        };

        info!(
            digest = %digest,
            generation,
            queries = snapshot.schedule.len(),
            file_categories = snapshot.watched_files.len(),
            warnings = warnings.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Published config snapshot"
        );
        self.published.store(Some(Arc::new(snapshot)));

        Ok(UpdateReport {
            changed: true,
            digest,
            generation,
            applied: outcome.applied,
            warnings,
        })
    }

    fn unchanged_report(&self) -> Result<UpdateReport, ConfigError> {
        let (digest, generation) = match self.snapshot() {
            Some(snapshot) => (snapshot.digest, snapshot.generation),
            None => (compute_digest(&ConfigTree::empty())?, 0),
        };
        Ok(UpdateReport {
            changed: false,
            digest,
            generation,
            applied: Vec::new(),
            warnings: Vec::new(),
        })
    }

    /// The current snapshot, if anything has been published
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.published.load_full()
    }

    /// Run `f` against the current snapshot without cloning it
    fn with_snapshot<R>(&self, f: impl FnOnce(&Snapshot) -> R) -> Option<R> {
        let guard = self.published.load();
        let current: &Option<Arc<Snapshot>> = &guard;
        current.as_deref().map(f)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match self.with_snapshot(|_| ()) {
            Some(()) => Lifecycle::Loaded,
            None => Lifecycle::Uninitialized,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.lifecycle() == Lifecycle::Loaded
    }

    /// Copy of the whole amalgamated tree (`{}` before the first publish)
    pub fn entire_configuration(&self) -> ConfigTree {
        self.with_snapshot(|s| s.tree.clone()).unwrap_or_default()
    }

    /// Digest of the published configuration
    pub fn digest(&self) -> Result<Digest, ConfigError> {
        self.with_snapshot(|s| s.digest)
            .ok_or(ConfigError::Uninitialized)
    }

    /// Hex form of [`ConfigState::digest`]
    pub fn md5(&self) -> Result<String, ConfigError> {
        self.digest().map(|d| d.to_hex())
    }

    pub fn scheduled_queries(&self) -> Vec<ScheduledQuery> {
        self.with_snapshot(|s| s.schedule.clone()).unwrap_or_default()
    }

    pub fn watched_files(&self) -> WatchedFiles {
        self.with_snapshot(|s| s.watched_files.clone())
            .unwrap_or_default()
    }

    /// Typed dotted-path lookup into the published tree
    pub fn get<T: DeserializeOwned>(&self, path: &str, default: T) -> T {
        match self.snapshot() {
            Some(snapshot) => snapshot.tree.get(path, default),
            None => default,
        }
    }
}

impl std::fmt::Debug for ConfigState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigState")
            .field("lifecycle", &self.lifecycle())
            .field("digest", &self.with_snapshot(|s| s.digest))
            .field("generation", &self.with_snapshot(|s| s.generation))
            .finish()
    }
}
