//! Filesystem config plugin: reads sources from a file or a directory of files
//!
//! A file path yields one source keyed by its canonical path. A directory
//! yields one source per `*.conf` / `*.json` file directly inside it, keyed by
//! file name, so sources in a `.d`-style directory merge in file-name order.

use super::ConfigPlugin;
use crate::error::ConfigError;
use crate::source::SourceMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extensions picked up when the config path is a directory
pub const SOURCE_EXTENSIONS: &[&str] = &["conf", "json"];

#[derive(Debug, Clone)]
pub struct FilesystemConfigPlugin {
    path: PathBuf,
}

impl FilesystemConfigPlugin {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(path: &Path) -> Result<String, ConfigError> {
        std::fs::read_to_string(path).map_err(|e| {
            ConfigError::ProviderUnavailable(format!(
                "cannot read config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    fn read_directory(dir: &Path) -> Result<SourceMap, ConfigError> {
        let mut sources = SourceMap::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| {
                ConfigError::ProviderUnavailable(format!(
                    "cannot list config directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let wanted = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| SOURCE_EXTENSIONS.contains(&ext))
                .unwrap_or(false);
            if !wanted {
                debug!(path = %path.display(), "Ignoring non-config file");
                continue;
            }
            // One unreadable file should not hide the rest of the directory.
            match std::fs::read_to_string(path) {
                Ok(body) => {
                    sources.insert(entry.file_name().to_string_lossy().into_owned(), body);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable config file"),
            }
        }
        Ok(sources)
    }
}

impl ConfigPlugin for FilesystemConfigPlugin {
    fn gen_config(&self) -> Result<SourceMap, ConfigError> {
        let canonical = dunce::canonicalize(&self.path).map_err(|e| {
            ConfigError::ProviderUnavailable(format!(
                "config path {} not accessible: {}",
                self.path.display(),
                e
            ))
        })?;

        if canonical.is_dir() {
            let sources = Self::read_directory(&canonical)?;
            debug!(dir = %canonical.display(), sources = sources.len(), "Read config directory");
            return Ok(sources);
        }

        let mut sources = SourceMap::new();
        sources.insert(
            canonical.to_string_lossy().into_owned(),
            Self::read_file(&canonical)?,
        );
        Ok(sources)
    }
}
