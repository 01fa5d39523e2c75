//! Amalgam CLI Binary
//!
//! Loads the configured sources, then prints the requested view.

use amalgam::cli::{Cli, RunContext};
use amalgam::logging::init_logging;
use amalgam::settings::AgentSettings;
use clap::Parser;
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let settings = match build_settings(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load settings: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(Some(&settings.logging)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Amalgam CLI starting");

    let context = match RunContext::new(settings) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

/// Settings from files and environment, then CLI flags on top
fn build_settings(cli: &Cli) -> Result<AgentSettings, amalgam::ConfigError> {
    let settings = AgentSettings::load(cli.settings.as_deref())?;
    Ok(apply_overrides(settings, cli))
}

fn apply_overrides(mut settings: AgentSettings, cli: &Cli) -> AgentSettings {
    if let Some(ref path) = cli.config_path {
        settings.config_path = path.clone();
    }
    if let Some(ref plugin) = cli.config_plugin {
        settings.config_plugin = plugin.clone();
    }
    if let Some(ref level) = cli.log_level {
        settings.logging.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        settings.logging.format = format.clone();
    }
    settings
}
