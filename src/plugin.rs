//! Config Plugins
//!
//! Capability interface for the collaborators that supply raw source text, and
//! the registry that maps plugin names to implementations. Exactly one plugin is
//! active at a time; it supplies the initial source set for `load`.
//!
//! Calls go through a uniform `(request) -> response` shape: the request is a
//! string map carrying an `action` key, the response a list of string-map rows.

use crate::error::ConfigError;
use crate::source::SourceMap;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info};

pub mod filesystem;

pub use filesystem::FilesystemConfigPlugin;

/// Request key naming the action to perform
pub const ACTION_KEY: &str = "action";
/// Action that asks a plugin for its full source set
pub const GEN_CONFIG_ACTION: &str = "genConfig";

pub type PluginRequest = BTreeMap<String, String>;
pub type PluginResponse = Vec<BTreeMap<String, String>>;

/// Build a request carrying only an action
pub fn action_request(action: &str) -> PluginRequest {
    let mut request = PluginRequest::new();
    request.insert(ACTION_KEY.to_string(), action.to_string());
    request
}

/// A source of raw configuration documents
pub trait ConfigPlugin: Send + Sync {
    /// Produce the plugin's complete source set (id -> body)
    fn gen_config(&self) -> Result<SourceMap, ConfigError>;

    /// Dispatch a generic request
    ///
    /// The default handles `genConfig` by returning the source map as a single
    /// response row; any other action is rejected. Calls routed through
    /// [`PluginRegistry`] report the registered name in `UnknownAction`.
    fn call(&self, request: &PluginRequest) -> Result<PluginResponse, ConfigError> {
        match request.get(ACTION_KEY).map(String::as_str) {
            Some(GEN_CONFIG_ACTION) => Ok(vec![self.gen_config()?]),
            other => Err(ConfigError::UnknownAction {
                plugin: std::any::type_name::<Self>().to_string(),
                action: other.unwrap_or_default().to_string(),
            }),
        }
    }
}

/// Plugin serving a fixed source map
#[derive(Debug, Clone, Default)]
pub struct StaticConfigPlugin {
    sources: SourceMap,
}

impl StaticConfigPlugin {
    pub fn new(sources: SourceMap) -> Self {
        Self { sources }
    }

    /// Single-source plugin
    pub fn single(id: impl Into<String>, body: impl Into<String>) -> Self {
        let mut sources = SourceMap::new();
        sources.insert(id.into(), body.into());
        Self { sources }
    }
}

impl ConfigPlugin for StaticConfigPlugin {
    fn gen_config(&self) -> Result<SourceMap, ConfigError> {
        Ok(self.sources.clone())
    }
}

/// Name -> plugin table, built at startup
#[derive(Default)]
pub struct PluginRegistry {
    plugins: HashMap<String, Arc<dyn ConfigPlugin>>,
    active: Option<String>,
}

impl PluginRegistry {
    /// Create an empty registry with no active plugin
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a plugin under `name`, replacing any previous holder of the name
    pub fn add(&mut self, name: impl Into<String>, plugin: Arc<dyn ConfigPlugin>) {
        let name = name.into();
        debug!(plugin = %name, "Registered config plugin");
        self.plugins.insert(name, plugin);
    }

    /// Make `name` the active plugin
    pub fn set_active(&mut self, name: &str) -> Result<(), ConfigError> {
        if !self.plugins.contains_key(name) {
            return Err(ConfigError::PluginNotFound(name.to_string()));
        }
        info!(plugin = %name, "Activated config plugin");
        self.active = Some(name.to_string());
        Ok(())
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn ConfigPlugin>> {
        self.plugins.get(name).cloned()
    }

    /// The active plugin, or `ProviderUnavailable` when none is set
    pub fn active(&self) -> Result<Arc<dyn ConfigPlugin>, ConfigError> {
        let name = self
            .active
            .as_deref()
            .ok_or_else(|| ConfigError::ProviderUnavailable("no active config plugin".to_string()))?;
        self.get(name)
            .ok_or_else(|| ConfigError::PluginNotFound(name.to_string()))
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.plugins.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Send a request to the active plugin
    pub fn call(&self, request: &PluginRequest) -> Result<PluginResponse, ConfigError> {
        let plugin = self.active()?;
        let name = self.active_name().unwrap_or_default();
        plugin
            .call(request)
            .map_err(|e| with_plugin_name(e, name))
    }

    /// Send a request to a named plugin, active or not
    pub fn call_plugin(
        &self,
        name: &str,
        request: &PluginRequest,
    ) -> Result<PluginResponse, ConfigError> {
        self.get(name)
            .ok_or_else(|| ConfigError::PluginNotFound(name.to_string()))?
            .call(request)
            .map_err(|e| with_plugin_name(e, name))
    }

    /// Ask the active plugin for its source set
    ///
    /// A plugin failure surfaces as `ProviderUnavailable` so `load` can tell it
    /// apart from problems inside individual documents.
    pub fn gen_config(&self) -> Result<SourceMap, ConfigError> {
        let plugin_name = self.active_name().unwrap_or("<none>").to_string();
        let response = self
            .call(&action_request(GEN_CONFIG_ACTION))
            .map_err(|e| match e {
                ConfigError::ProviderUnavailable(_) => e,
                other => ConfigError::ProviderUnavailable(format!("{}: {}", plugin_name, other)),
            })?;
        Ok(response.into_iter().next().unwrap_or_default())
    }
}

fn with_plugin_name(err: ConfigError, name: &str) -> ConfigError {
    match err {
        ConfigError::UnknownAction { action, .. } => ConfigError::UnknownAction {
            plugin: name.to_string(),
            action,
        },
        other => other,
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PluginRegistry")
            .field("plugins", &self.names())
            .field("active", &self.active)
            .finish()
    }
}
