//! CLI route: single route table and run context.

use crate::cli::parse::Commands;
use crate::cli::presentation::{format_report, format_schedule, format_watched_files};
use crate::error::ConfigError;
use crate::refresh::spawn_refresh;
use crate::settings::AgentSettings;
use crate::source::SourceDocument;
use crate::state::ConfigState;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Runtime context for CLI execution: settings and the loaded config state
pub struct RunContext {
    settings: AgentSettings,
    state: Arc<ConfigState>,
}

impl RunContext {
    /// Build the plugin registry from settings and load the configuration
    pub fn new(settings: AgentSettings) -> Result<Self, ConfigError> {
        let registry = settings.build_registry()?;
        let state = Arc::new(ConfigState::from_registry(registry));
        let report = state.load()?;
        info!(
            digest = %report.digest,
            sources = report.applied.len(),
            warnings = report.warnings.len(),
            "Configuration loaded"
        );
        Ok(Self { settings, state })
    }

    pub fn state(&self) -> Arc<ConfigState> {
        Arc::clone(&self.state)
    }

    pub fn execute(&self, command: &Commands) -> Result<String, ConfigError> {
        match command {
            Commands::Show => Ok(self.state.entire_configuration().to_string()),
            Commands::Digest => self.state.md5(),
            Commands::Schedule { format } => {
                let queries = self.state.scheduled_queries();
                if format == "json" {
                    to_json(&queries)
                } else {
                    Ok(format_schedule(&queries))
                }
            }
            Commands::Watched { format } => {
                let files = self.state.watched_files();
                if format == "json" {
                    to_json(&files)
                } else {
                    Ok(format_watched_files(&files))
                }
            }
            Commands::Get { path } => {
                let tree = self.state.entire_configuration();
                match tree.lookup(path) {
                    Some(serde_json::Value::String(s)) => Ok(s.clone()),
                    Some(value) => Ok(value.to_string()),
                    None => Err(ConfigError::PathNotFound(path.clone())),
                }
            }
            Commands::Merge { files } => {
                let mut documents = Vec::with_capacity(files.len());
                for path in files {
                    let body = std::fs::read_to_string(path).map_err(|e| {
                        ConfigError::ProviderUnavailable(format!(
                            "cannot read {}: {}",
                            path.display(),
                            e
                        ))
                    })?;
                    let id = path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string());
                    documents.push(SourceDocument::new(id, body));
                }
                let report = self.state.update(documents)?;
                Ok(format_report(&report))
            }
            Commands::Watch { interval } => {
                let period = match interval {
                    Some(0) | None => self.settings.refresh_interval(),
                    Some(secs) => Some(Duration::from_secs(*secs)),
                }
                .ok_or_else(|| {
                    ConfigError::Settings(
                        "watch needs --interval or a non-zero refresh_interval_secs".to_string(),
                    )
                })?;
                self.watch(period)
            }
        }
    }

    fn watch(&self, period: Duration) -> Result<String, ConfigError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        let state = self.state();
        runtime.block_on(async move {
            info!(period_secs = period.as_secs(), "Watching configuration");
            let handle = spawn_refresh(Arc::clone(&state), period)?;
            let signal = tokio::signal::ctrl_c().await;
            handle.abort();
            signal?;
            Ok::<_, ConfigError>(format!("Stopped watching at digest {}", state.md5()?))
        })
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, ConfigError> {
    Ok(serde_json::to_string_pretty(value)?)
}
