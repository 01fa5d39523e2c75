//! Agent settings: which plugin supplies config, where it reads from, how often
//! to refresh, and logging.
//!
//! Precedence (lowest to highest): built-in defaults, the user settings file
//! (`settings.toml` in the platform config dir), an explicit settings file,
//! then `AMALGAM_*` environment variables (`AMALGAM_LOGGING__LEVEL=debug`).

use crate::error::ConfigError;
use crate::logging::LoggingConfig;
use crate::plugin::{FilesystemConfigPlugin, PluginRegistry};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_CONFIG_PLUGIN: &str = "filesystem";
pub const DEFAULT_CONFIG_PATH: &str = "/etc/amalgam/amalgam.conf";
pub const ENV_PREFIX: &str = "AMALGAM";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSettings {
    /// Name of the plugin that supplies `load`'s sources
    pub config_plugin: String,

    /// File or directory read by the filesystem plugin
    pub config_path: PathBuf,

    /// Seconds between refreshes; 0 disables the refresh loop
    pub refresh_interval_secs: u64,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            config_plugin: DEFAULT_CONFIG_PLUGIN.to_string(),
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            refresh_interval_secs: 0,
            logging: LoggingConfig::default(),
        }
    }
}

fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    Config::builder()
        .set_default("config_plugin", DEFAULT_CONFIG_PLUGIN)?
        .set_default("config_path", DEFAULT_CONFIG_PATH)?
        .set_default("refresh_interval_secs", 0_i64)
}

impl AgentSettings {
    /// Path of the per-user settings file, if the platform has a config dir
    pub fn user_settings_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "amalgam")
            .map(|dirs| dirs.config_dir().join("settings.toml"))
    }

    /// Assemble settings from every layer
    ///
    /// A missing user settings file is fine; a missing explicit one is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let user_path = Self::user_settings_path();
        Self::load_layers(user_path.as_deref(), explicit)
    }

    /// [`AgentSettings::load`] with the user settings file given explicitly;
    /// `None` skips that layer
    pub fn load_layers(user: Option<&Path>, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = builder_with_defaults()?;

        if let Some(user_path) = user {
            if user_path.exists() {
                debug!(path = %user_path.display(), "Reading user settings");
                builder = builder.add_source(File::from(user_path).required(false));
            }
        }

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: AgentSettings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }

    /// Refresh period, `None` when disabled
    pub fn refresh_interval(&self) -> Option<Duration> {
        match self.refresh_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Registry holding the built-in plugins, with the configured one active
    pub fn build_registry(&self) -> Result<PluginRegistry, ConfigError> {
        let mut registry = PluginRegistry::new();
        registry.add(
            DEFAULT_CONFIG_PLUGIN,
            Arc::new(FilesystemConfigPlugin::new(&self.config_path)),
        );
        registry.set_active(&self.config_plugin)?;
        Ok(registry)
    }
}
